//! 词法分析模块

pub mod error;
pub mod position;
pub mod scanner;
pub mod token;

pub use error::{LexError, LexErrorKind};
pub use position::SourcePosition;
pub use scanner::{is_identifier_continue, is_identifier_start, Lexer};
pub use token::{Token, TokenKind};
