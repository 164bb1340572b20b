//! 测试辅助工具
//!
//! 提供端到端测试的辅助函数

#![allow(dead_code)]

use lcfg::{Document, LcfgError, LoadConfig, Loader, MemoryFileSystem};
use std::path::Path;

/// 创建测试用的内存文件系统
pub fn create_test_fs(files: Vec<(&str, &str)>) -> MemoryFileSystem {
    MemoryFileSystem::with_files(
        files
            .into_iter()
            .map(|(path, content)| (path.to_string(), content.as_bytes().to_vec())),
    )
}

/// 从内存文件系统加载入口文件
pub fn load(fs: &MemoryFileSystem, entry: &str) -> Result<Document, LcfgError> {
    Loader::with_config(fs.clone(), LoadConfig::default()).load_file(Path::new(entry))
}

/// 解析文本并输出规范形式
pub fn reformat(source: &str) -> Result<String, LcfgError> {
    let config = LoadConfig::default();
    let doc = lcfg::load_string_with(source, &config)?;
    Ok(lcfg::to_string_with(&doc, &config))
}
