//! lcfg Core - configuration engine (pure logic)
//!
//! Contains the lexer, include resolver, parser, settings tree, and serializer.
//! File access goes through a [`VirtualFileSystem`]; no terminal output and no
//! global state. Configuration is passed explicitly via parameters.

pub mod error;
pub mod format;
pub mod include;
pub mod lexer;
pub mod parser;
pub mod tree;

use lcfg_vfs::VirtualFileSystem;
use std::path::{Path, PathBuf};

// Re-export common types
pub use error::{Error, Result};
pub use format::Serializer;
pub use include::{IncludeError, IncludeErrorKind, IncludeResolver, TokenStream};
pub use lexer::{LexError, LexErrorKind, Lexer, Token, TokenKind};
pub use parser::{ParseError, ParseErrorKind, Parser};
pub use tree::{Document, FromValue, Setting, SettingError, SettingId, SettingType, Value};

// Re-export config types from lcfg-config
pub use lcfg_config::{FormatConfig, IntFormat, MissingInclude, ParseConfig, Phase};

/// Parse configuration text, expanding `@include` directives through `vfs`.
///
/// `origin` is the file the text was read from (used for relative includes and
/// error locations). The returned document remembers `search_paths`.
pub fn parse_source(
    vfs: &dyn VirtualFileSystem,
    source: &str,
    origin: Option<&Path>,
    search_paths: &[PathBuf],
    config: &ParseConfig,
) -> Result<Document> {
    let tokens = IncludeResolver::new(vfs, config)
        .with_search_paths(search_paths.iter().cloned())
        .resolve(source, origin);
    let mut document = Parser::new(tokens).with_config(config).parse()?;
    document.set_search_paths(search_paths.to_vec());
    Ok(document)
}

/// Render a document in canonical form.
pub fn serialize(document: &Document, config: &FormatConfig) -> String {
    Serializer::new(config).serialize(document)
}
