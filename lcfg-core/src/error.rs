//! lcfg-core 统一错误类型

use crate::include::IncludeError;
use crate::lexer::LexError;
use crate::parser::ParseError;
use crate::tree::SettingError;
use lcfg_config::Phase;
use std::path::Path;
use thiserror::Error;

/// 解析与设置树操作的统一错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("{0}")]
    Lex(#[from] LexError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Include(#[from] IncludeError),

    #[error("{0}")]
    Setting(#[from] SettingError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// 行号（1-based）
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Lex(e) => Some(e.line()),
            Error::Parse(e) => Some(e.line),
            Error::Include(e) => Some(e.line()),
            Error::Setting(_) => None,
        }
    }

    /// 列号（1-based）
    pub fn column(&self) -> Option<usize> {
        match self {
            Error::Lex(e) => Some(e.column()),
            Error::Parse(e) => Some(e.column),
            Error::Include(e) => Some(e.column()),
            Error::Setting(_) => None,
        }
    }

    /// 出错的源文件
    pub fn file(&self) -> Option<&Path> {
        match self {
            Error::Lex(e) => e.file.as_deref(),
            Error::Parse(e) => e.file.as_deref(),
            Error::Include(e) => e.file.as_deref(),
            Error::Setting(_) => None,
        }
    }

    /// 产生错误的阶段
    pub fn phase(&self) -> Phase {
        match self {
            Error::Lex(_) => Phase::Lexer,
            Error::Parse(_) => Phase::Parser,
            Error::Include(_) => Phase::Include,
            Error::Setting(_) => Phase::Tree,
        }
    }
}
