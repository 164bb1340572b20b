//! Token 类型定义

use super::position::SourcePosition;
use lcfg_config::IntFormat;
use std::path::Path;
use std::sync::Arc;

/// Token 种类（字面量携带已解码的值）
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// 设置名
    Identifier,
    /// 字符串字面量（已处理转义，相邻字面量已合并）
    String(String),
    /// 32 位整数
    Integer { value: i32, format: IntFormat },
    /// 64 位整数（`L` 后缀或超出 32 位范围）
    Integer64 { value: i64, format: IntFormat },
    /// 浮点数
    Float(f64),
    /// 布尔值（大小写不敏感）
    Boolean(bool),

    LeftCurlyBrace,
    RightCurlyBrace,
    LeftSquareBracket,
    RightSquareBracket,
    LeftParenthesis,
    RightParenthesis,
    Comma,
    Semicolon,
    Equal,
    Colon,

    /// `@include` 指令
    Include,
    /// 输入结束标记
    Eof,
}

impl TokenKind {
    /// 是否为标量字面量（可作为数组元素）
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TokenKind::String(_)
                | TokenKind::Integer { .. }
                | TokenKind::Integer64 { .. }
                | TokenKind::Float(_)
                | TokenKind::Boolean(_)
        )
    }

    /// 用于错误消息的简短描述
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::String(_) => "string",
            TokenKind::Integer { .. } => "integer",
            TokenKind::Integer64 { .. } => "64-bit integer",
            TokenKind::Float(_) => "float",
            TokenKind::Boolean(_) => "boolean",
            TokenKind::LeftCurlyBrace => "'{'",
            TokenKind::RightCurlyBrace => "'}'",
            TokenKind::LeftSquareBracket => "'['",
            TokenKind::RightSquareBracket => "']'",
            TokenKind::LeftParenthesis => "'('",
            TokenKind::RightParenthesis => "')'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Equal => "'='",
            TokenKind::Colon => "':'",
            TokenKind::Include => "@include",
            TokenKind::Eof => "end of input",
        }
    }
}

/// Token 结构
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// 原始源码文本
    pub text: String,
    /// 起始位置
    pub position: SourcePosition,
    /// 来源文件（字符串输入时为 None）
    pub file: Option<Arc<Path>>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
            file: None,
        }
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}
