//! 基于虚拟文件系统的加载与保存

use crate::config::LoadConfig;
use crate::error::LcfgError;
use lcfg_core::Document;
use lcfg_vfs::{NativeFileSystem, VirtualFileSystem};
use std::path::Path;
use tracing::{debug, info, instrument};

const TARGET: &str = "lcfg";

/// 配置加载器
///
/// 所有文件访问（主文件、`@include`、保存）都经过同一个文件系统，
/// 测试中可以换成 `MemoryFileSystem`。
#[derive(Debug, Clone)]
pub struct Loader<F: VirtualFileSystem> {
    fs: F,
    config: LoadConfig,
}

impl Loader<NativeFileSystem> {
    /// 使用本地文件系统
    pub fn native(config: LoadConfig) -> Self {
        Self::with_config(NativeFileSystem::new(), config)
    }
}

impl<F: VirtualFileSystem> Loader<F> {
    pub fn new(fs: F) -> Self {
        Self::with_config(fs, LoadConfig::default())
    }

    pub fn with_config(fs: F, config: LoadConfig) -> Self {
        Self { fs, config }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// 读取并解析文件，展开其中的 `@include`
    #[instrument(target = "lcfg", skip_all, fields(path = %path.display()))]
    pub fn load_file(&self, path: &Path) -> Result<Document, LcfgError> {
        info!(target: TARGET, "Loading configuration file");
        let text = self.fs.read_to_string(path)?;
        let document = lcfg_core::parse_source(
            &self.fs,
            &text,
            Some(path),
            &self.config.search_paths,
            self.config.parse(),
        )?;
        debug!(target: TARGET, settings = document.node_count(), "Loaded configuration");
        Ok(document)
    }

    /// 解析内存中的文本；相对包含按搜索路径与当前目录查找
    #[instrument(target = "lcfg", skip_all, fields(bytes = text.len()))]
    pub fn load_string(&self, text: &str) -> Result<Document, LcfgError> {
        let document = lcfg_core::parse_source(
            &self.fs,
            text,
            None,
            &self.config.search_paths,
            self.config.parse(),
        )?;
        debug!(target: TARGET, settings = document.node_count(), "Parsed configuration text");
        Ok(document)
    }

    /// 规范形式文本
    pub fn to_string(&self, document: &Document) -> String {
        lcfg_core::serialize(document, self.config.format())
    }

    /// 以规范形式写入文件（整体覆盖）
    #[instrument(target = "lcfg", skip_all, fields(path = %path.display()))]
    pub fn save_file(&self, document: &Document, path: &Path) -> Result<(), LcfgError> {
        let text = self.to_string(document);
        self.fs.write_file(path, text.as_bytes())?;
        info!(target: TARGET, bytes = text.len(), "Saved configuration file");
        Ok(())
    }
}
