//! 测试辅助工具

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 在临时目录中创建文件，返回目录句柄（drop 时删除）
pub fn create_temp_tree(files: Vec<(&str, &str)>) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&full, content).expect("write test file");
    }
    dir
}

pub fn path_in(dir: &TempDir, relative: &str) -> PathBuf {
    dir.path().join(relative)
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read test file")
}
