//! Lexer 错误类型
//!
//! 提供结构化的词法错误信息，包含错误类型、位置和来源文件。

use super::position::SourcePosition;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// 词法错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// 非法字符
    #[error("Invalid character '{0}'")]
    InvalidChar(char),
    /// 未终止的字符串
    #[error("Unterminated string literal")]
    UnterminatedString,
    /// 未终止的块注释
    #[error("Unterminated block comment")]
    UnterminatedComment,
    /// 非法转义序列
    #[error("Invalid escape sequence '{0}'")]
    InvalidEscape(String),
    /// 数字格式错误或溢出
    #[error("Invalid number format '{0}'")]
    InvalidNumber(String),
}

/// 词法错误，包含结构化信息
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    /// 错误类型
    pub kind: LexErrorKind,
    /// 错误发生的位置
    pub position: SourcePosition,
    /// 来源文件
    pub file: Option<Arc<Path>>,
}

impl LexError {
    /// 在指定位置创建错误
    pub fn at(kind: LexErrorKind, position: SourcePosition) -> Self {
        Self {
            kind,
            position,
            file: None,
        }
    }

    /// 获取行号（1-based）
    pub fn line(&self) -> usize {
        self.position.line
    }

    /// 获取列号（1-based）
    pub fn column(&self) -> usize {
        self.position.column
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:", file.display())?;
        }
        write!(f, "[{}] {}", self.position, self.kind)
    }
}

impl std::error::Error for LexError {}
