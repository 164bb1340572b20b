//! API 层配置
//!
//! 包含加载配置 LoadConfig 和全局单例（供 CLI 使用）

use lcfg_config::{FormatConfig, LcfgConfig, ParseConfig};
use once_cell::sync::{Lazy, OnceCell};
use std::path::PathBuf;

/// Load/save configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadConfig {
    /// Parse and format settings
    pub options: LcfgConfig,
    /// Directories searched for relative `@include` paths, in order
    pub search_paths: Vec<PathBuf>,
}

impl LoadConfig {
    pub fn new(options: LcfgConfig) -> Self {
        Self {
            options,
            search_paths: Vec::new(),
        }
    }

    pub fn with_search_paths<P: Into<PathBuf>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        self.search_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn parse(&self) -> &ParseConfig {
        &self.options.parse
    }

    pub fn format(&self) -> &FormatConfig {
        &self.options.format
    }
}

// Global config singleton for CLI convenience
static GLOBAL_CONFIG: OnceCell<LoadConfig> = OnceCell::new();

// Used until `init` is called; never installed into GLOBAL_CONFIG
static DEFAULT_CONFIG: Lazy<LoadConfig> = Lazy::new(LoadConfig::default);

/// Initialize global configuration
///
/// Returns the rejected config if one was already installed.
pub fn init(config: LoadConfig) -> Result<(), LoadConfig> {
    GLOBAL_CONFIG.set(config)
}

/// Get global config reference (defaults if never initialized)
///
/// Reading the defaults does not initialize the global, so a later `init`
/// still takes effect.
pub fn config() -> &'static LoadConfig {
    GLOBAL_CONFIG.get().unwrap_or(&DEFAULT_CONFIG)
}

/// Check if config is initialized
pub fn is_initialized() -> bool {
    GLOBAL_CONFIG.get().is_some()
}
