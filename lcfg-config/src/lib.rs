//! lcfg Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all lcfg crates:
//! the parser reads [`ParseConfig`], the serializer reads [`FormatConfig`],
//! and the CLI loads an [`LcfgConfig`] from a JSON options file.

use serde::{Deserialize, Serialize};

/// Configuration for parsing and include expansion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Maximum `@include` nesting depth
    pub max_include_depth: usize,
    /// Maximum group/list/array nesting depth
    pub max_nesting_depth: usize,
    /// What to do when an included file cannot be found
    pub missing_include: MissingInclude,
}

/// Policy for `@include` directives whose file does not exist
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingInclude {
    /// Fail the whole parse
    #[default]
    Fail,
    /// Drop the directive and keep parsing
    Skip,
}

/// Configuration for the canonical text serializer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Spaces per nesting level
    pub indent_width: usize,
    /// Arrays and lists longer than this are printed one element per line
    pub max_inline_width: usize,
    /// Fixed number of fractional digits for floats (None = shortest exact form)
    pub float_precision: Option<usize>,
}

/// Display format of an integer setting
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntFormat {
    #[default]
    Decimal,
    Hex,
}

/// Top-level configuration combining parse and format settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LcfgConfig {
    pub parse: ParseConfig,
    pub format: FormatConfig,
}

impl LcfgConfig {
    /// Parse a configuration from JSON text; missing fields take their defaults
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Processing phase enum for phase-specific log filtering
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Lexer,
    Include,
    Parser,
    Tree,
    Format,
}

impl Phase {
    /// All phases, in pipeline order
    pub const ALL: [Phase; 5] = [
        Phase::Lexer,
        Phase::Include,
        Phase::Parser,
        Phase::Tree,
        Phase::Format,
    ];

    /// Get the string name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Lexer => "lexer",
            Phase::Include => "include",
            Phase::Parser => "parser",
            Phase::Tree => "tree",
            Phase::Format => "format",
        }
    }

    /// Get the log target name for this phase
    pub fn target(&self) -> &'static str {
        match self {
            Phase::Lexer => "lcfg::lexer",
            Phase::Include => "lcfg::include",
            Phase::Parser => "lcfg::parser",
            Phase::Tree => "lcfg::tree",
            Phase::Format => "lcfg::format",
        }
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_include_depth: 32,
            max_nesting_depth: 256,
            missing_include: MissingInclude::Fail,
        }
    }
}

impl ParseConfig {
    /// Same as default, but missing includes are skipped
    pub fn skip_missing_includes() -> Self {
        Self {
            missing_include: MissingInclude::Skip,
            ..Self::default()
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            max_inline_width: 80,
            float_precision: None,
        }
    }
}
