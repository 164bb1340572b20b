//! 语法错误

use crate::tree::SettingType;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// 语法错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// 意外的 token
    #[error("Unexpected {found}, expected {expected}")]
    UnexpectedToken { expected: String, found: String },
    /// 同一分组内重复的名称
    #[error("Duplicate setting name '{name}'")]
    DuplicateKey { name: String },
    /// 数组元素类型不一致
    #[error("Array element type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: SettingType,
        found: SettingType,
    },
    /// 未终止的字符串
    #[error("Unterminated string literal")]
    UnterminatedString,
    /// 嵌套过深
    #[error("Nesting too deep (limit {limit})")]
    NestingTooDeep { limit: usize },
}

/// 语法错误，包含位置信息
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// 错误类型
    pub kind: ParseErrorKind,
    /// 行号（1-based）
    pub line: usize,
    /// 列号（1-based）
    pub column: usize,
    /// 来源文件
    pub file: Option<Arc<Path>>,
}

impl ParseError {
    /// 在指定位置创建错误
    pub fn at(kind: ParseErrorKind, line: usize, column: usize, file: Option<Arc<Path>>) -> Self {
        Self {
            kind,
            line,
            column,
            file,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:", file.display())?;
        }
        write!(f, "[{}:{}] {}", self.line, self.column, self.kind)
    }
}

impl std::error::Error for ParseError {}
