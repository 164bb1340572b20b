//! Lexical path normalization
//!
//! Include cycle detection compares files by their normalized path, so
//! `conf/../conf/a.cfg` and `conf/a.cfg` must map to the same key. This is
//! purely lexical: symlinks are not resolved and the file system is not hit.

use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components of a path without touching the disk.
///
/// A `..` that would climb above the root of an absolute path is dropped;
/// leading `..` components of a relative path are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    out.pop();
                    depth -= 1;
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(name) => {
                out.push(name);
                depth += 1;
            }
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_current_dir() {
        assert_eq!(normalize(Path::new("./a/./b.cfg")), PathBuf::from("a/b.cfg"));
    }

    #[test]
    fn test_normalize_parent_dir() {
        assert_eq!(
            normalize(Path::new("/etc/app/../app/main.cfg")),
            PathBuf::from("/etc/app/main.cfg")
        );
    }

    #[test]
    fn test_normalize_parent_above_root() {
        assert_eq!(normalize(Path::new("/../a.cfg")), PathBuf::from("/a.cfg"));
    }

    #[test]
    fn test_normalize_leading_parent_relative() {
        assert_eq!(normalize(Path::new("../x/../y.cfg")), PathBuf::from("../y.cfg"));
    }

    #[test]
    fn test_normalize_empty_is_dot() {
        assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
    }
}
