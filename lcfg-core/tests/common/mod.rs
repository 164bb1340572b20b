//! 测试辅助工具
//!
//! 提供端到端测试的辅助函数

#![allow(dead_code)]

use lcfg_core::{parse_source, Document, Error, ParseConfig, Serializer};
use lcfg_vfs::MemoryFileSystem;
use std::path::Path;

/// 创建测试用的内存文件系统
pub fn create_test_fs(files: Vec<(&str, &str)>) -> MemoryFileSystem {
    MemoryFileSystem::with_files(
        files
            .into_iter()
            .map(|(path, content)| (path.to_string(), content.as_bytes().to_vec())),
    )
}

/// 解析不含 `@include` 的文本
pub fn parse(source: &str) -> Result<Document, Error> {
    let vfs = MemoryFileSystem::new();
    parse_source(&vfs, source, None, &[], &ParseConfig::default())
}

/// 解析内存文件系统中的入口文件
pub fn parse_entry(fs: &MemoryFileSystem, entry: &str, config: &ParseConfig) -> Result<Document, Error> {
    let text = lcfg_vfs::VirtualFileSystem::read_to_string(fs, Path::new(entry))
        .expect("entry file must exist");
    parse_source(fs, &text, Some(Path::new(entry)), &[], config)
}

/// 规范输出
pub fn canonical(doc: &Document) -> String {
    Serializer::default().serialize(doc)
}
