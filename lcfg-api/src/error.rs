//! API 错误类型
//!
//! 提供统一的错误类型和结构化错误报告。

use lcfg_core::{IncludeErrorKind, Phase};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

pub use lcfg_core::{IncludeError, LexError, ParseError, SettingError};
pub use lcfg_vfs::VfsError;

/// lcfg 错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LcfgError {
    /// 词法错误
    #[error("{0}")]
    Lexer(LexError),

    /// 语法错误
    #[error("{0}")]
    Parser(ParseError),

    /// 包含展开错误
    #[error("{0}")]
    Include(IncludeError),

    /// 设置树访问/修改错误
    #[error("{0}")]
    Setting(#[from] SettingError),

    /// 文件读写错误
    #[error("{0}")]
    Io(#[from] VfsError),
}

impl From<lcfg_core::Error> for LcfgError {
    fn from(err: lcfg_core::Error) -> Self {
        match err {
            lcfg_core::Error::Lex(e) => LcfgError::Lexer(e),
            lcfg_core::Error::Parse(e) => LcfgError::Parser(e),
            lcfg_core::Error::Include(e) => LcfgError::Include(e),
            lcfg_core::Error::Setting(e) => LcfgError::Setting(e),
        }
    }
}

impl LcfgError {
    /// 获取错误行号（如果有）
    pub fn line(&self) -> Option<usize> {
        match self {
            LcfgError::Lexer(e) => Some(e.line()),
            LcfgError::Parser(e) => Some(e.line),
            LcfgError::Include(e) => Some(e.line()),
            LcfgError::Setting(_) | LcfgError::Io(_) => None,
        }
    }

    /// 获取错误列号（如果有）
    pub fn column(&self) -> Option<usize> {
        match self {
            LcfgError::Lexer(e) => Some(e.column()),
            LcfgError::Parser(e) => Some(e.column),
            LcfgError::Include(e) => Some(e.column()),
            LcfgError::Setting(_) | LcfgError::Io(_) => None,
        }
    }

    /// 出错的源文件（如果有）
    pub fn file(&self) -> Option<&Path> {
        match self {
            LcfgError::Lexer(e) => e.file.as_deref(),
            LcfgError::Parser(e) => e.file.as_deref(),
            LcfgError::Include(e) => e.file.as_deref(),
            LcfgError::Setting(_) | LcfgError::Io(_) => None,
        }
    }

    /// 获取错误阶段名称
    pub fn phase(&self) -> &'static str {
        match self {
            LcfgError::Lexer(_) => Phase::Lexer.as_str(),
            LcfgError::Parser(_) => Phase::Parser.as_str(),
            LcfgError::Include(_) => Phase::Include.as_str(),
            LcfgError::Setting(_) => Phase::Tree.as_str(),
            LcfgError::Io(_) => "io",
        }
    }

    /// 不含位置前缀的错误消息
    fn message(&self) -> String {
        match self {
            LcfgError::Lexer(e) => e.kind.to_string(),
            LcfgError::Parser(e) => e.kind.to_string(),
            LcfgError::Include(e) => e.kind.to_string(),
            LcfgError::Setting(e) => e.to_string(),
            LcfgError::Io(e) => e.to_string(),
        }
    }

    /// 错误类型名（可用于程序化处理）
    fn error_kind(&self) -> String {
        let debug = match self {
            LcfgError::Lexer(e) => format!("{:?}", e.kind),
            LcfgError::Parser(e) => format!("{:?}", e.kind),
            LcfgError::Include(e) => format!("{:?}", e.kind),
            LcfgError::Setting(e) => format!("{:?}", e),
            LcfgError::Io(e) => format!("{:?}", e),
        };
        debug.chars().take_while(|c| c.is_alphanumeric()).collect()
    }

    /// 转换为结构化错误报告
    ///
    /// CLI 可以直接打印，上层应用可以序列化为 JSON。
    pub fn to_report(&self) -> ErrorReport {
        let details = match self {
            LcfgError::Include(IncludeError {
                kind: IncludeErrorKind::Cycle { chain },
                ..
            }) => Some(ErrorDetails::IncludeChain {
                chain: chain.clone(),
            }),
            LcfgError::Include(IncludeError {
                kind: IncludeErrorKind::NotFound { tried, .. },
                ..
            }) => Some(ErrorDetails::Candidates {
                tried: tried.iter().map(|p| p.display().to_string()).collect(),
            }),
            _ => None,
        };
        ErrorReport {
            phase: self.phase(),
            file: self.file().map(|f| f.display().to_string()),
            line: self.line(),
            column: self.column(),
            error_kind: self.error_kind(),
            message: self.message(),
            details,
        }
    }
}

/// 结构化错误报告
///
/// 上层应用（CLI、编辑器插件）可以根据自己的需求格式化。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    /// 错误阶段: lexer, include, parser, tree, io
    pub phase: &'static str,
    /// 出错文件（如果有）
    pub file: Option<String>,
    /// 错误行号（1-based，如果有）
    pub line: Option<usize>,
    /// 错误列号（1-based，如果有）
    pub column: Option<usize>,
    /// 错误类型（可用于程序化处理）
    pub error_kind: String,
    /// 人类可读的错误消息
    pub message: String,
    /// 额外详情
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

/// 错误额外详情
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorDetails {
    /// 循环包含链
    IncludeChain { chain: Vec<String> },
    /// 查找过的包含文件候选路径
    Candidates { tried: Vec<String> },
}

impl std::fmt::Display for ErrorReport {
    /// 默认的 CLI 友好格式
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:", file)?;
        }
        match (self.line, self.column) {
            (Some(line), Some(col)) => {
                write!(f, "[{}:{}] {} error: {}", line, col, self.phase, self.message)
            }
            _ => write!(f, "{} error: {}", self.phase, self.message),
        }
    }
}

impl ErrorReport {
    /// 转换为 JSON 格式
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// 简洁格式（适合终端）
    pub fn to_short(&self) -> String {
        format!("{}: {}", self.phase, self.message)
    }
}
