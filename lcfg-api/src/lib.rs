//! lcfg API - 加载/保存入口与统一错误
//!
//! 提供：
//! - 文件与文本的加载、规范形式的保存（`load_file`、`save_file` 等）
//! - 配置抽象（LoadConfig）
//! - 统一错误处理（LcfgError）
//!
//! CLI 可以使用全局单例配置（`init_config`）；库使用推荐显式的 `*_with` 接口。

use std::path::{Path, PathBuf};

pub mod config;
pub use config::{config as get_config, init as init_config, is_initialized, LoadConfig};

pub mod error;
pub use error::{ErrorDetails, ErrorReport, IncludeError, LcfgError, LexError, ParseError, SettingError, VfsError};

pub mod loader;
pub use loader::Loader;

// Re-export config and core types
pub use lcfg_config::{self, FormatConfig, IntFormat, LcfgConfig, MissingInclude, ParseConfig, Phase};
pub use lcfg_core::{Document, FromValue, Setting, SettingId, SettingType, Value};
pub use lcfg_vfs::{MemoryFileSystem, NativeFileSystem, VirtualFileSystem};

/// 按显式配置加载文件
pub fn load_file_with(path: impl AsRef<Path>, config: &LoadConfig) -> Result<Document, LcfgError> {
    Loader::native(config.clone()).load_file(path.as_ref())
}

/// 按显式配置解析文本
pub fn load_string_with(text: &str, config: &LoadConfig) -> Result<Document, LcfgError> {
    Loader::native(config.clone()).load_string(text)
}

/// 按显式配置保存文件
pub fn save_file_with(document: &Document, path: impl AsRef<Path>, config: &LoadConfig) -> Result<(), LcfgError> {
    Loader::native(config.clone()).save_file(document, path.as_ref())
}

/// 按显式格式配置输出规范文本
pub fn to_string_with(document: &Document, config: &LoadConfig) -> String {
    lcfg_core::serialize(document, config.format())
}

// ==================== 全局配置 API ====================

/// 加载文件；`search_paths` 追加在全局搜索路径之前
pub fn load_file<P: Into<PathBuf>>(
    path: impl AsRef<Path>,
    search_paths: impl IntoIterator<Item = P>,
) -> Result<Document, LcfgError> {
    let mut config = get_config().clone();
    let mut paths: Vec<PathBuf> = search_paths.into_iter().map(Into::into).collect();
    paths.append(&mut config.search_paths);
    config.search_paths = paths;
    load_file_with(path, &config)
}

/// 解析文本（使用全局配置）
pub fn load_string(text: &str) -> Result<Document, LcfgError> {
    load_string_with(text, get_config())
}

/// 保存文件（使用全局配置）
pub fn save_file(document: &Document, path: impl AsRef<Path>) -> Result<(), LcfgError> {
    save_file_with(document, path, get_config())
}

/// 规范文本（使用全局配置）
pub fn to_string(document: &Document) -> String {
    to_string_with(document, get_config())
}
