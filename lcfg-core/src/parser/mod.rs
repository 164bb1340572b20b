//! 语法分析模块

pub mod error;
pub mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use parser::{LexerTokens, Parser};
