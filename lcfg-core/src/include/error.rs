//! 包含解析错误

use crate::lexer::SourcePosition;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// 包含错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IncludeErrorKind {
    /// 文件未找到
    #[error("Cannot open include file '{path}'")]
    NotFound {
        /// `@include` 中写的路径
        path: String,
        /// 尝试过的文件路径
        tried: Vec<PathBuf>,
    },
    /// 循环包含
    #[error("Include cycle detected: {}", .chain.join(" -> "))]
    Cycle {
        /// 包含链，末尾为重复进入的文件
        chain: Vec<String>,
    },
    /// 包含嵌套过深
    #[error("Include file nesting too deep (limit {limit})")]
    TooDeep { limit: usize },
    /// 文件读取失败
    #[error("Failed to read include file '{}': {message}", .path.display())]
    Read { path: PathBuf, message: String },
}

/// 包含错误，位置指向 `@include` 指令
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeError {
    pub kind: IncludeErrorKind,
    pub position: SourcePosition,
    pub file: Option<Arc<Path>>,
}

impl IncludeError {
    pub fn at(kind: IncludeErrorKind, position: SourcePosition, file: Option<Arc<Path>>) -> Self {
        Self {
            kind,
            position,
            file,
        }
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }
}

impl std::fmt::Display for IncludeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:", file.display())?;
        }
        write!(f, "[{}] {}", self.position, self.kind)?;
        if let IncludeErrorKind::NotFound { tried, .. } = &self.kind {
            if !tried.is_empty() {
                write!(f, ". Tried:")?;
                for path in tried {
                    write!(f, "\n  - {}", path.display())?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for IncludeError {}
