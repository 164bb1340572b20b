//! In-memory file system implementation

use crate::error::{VfsError, VfsResult};
use crate::path::normalize;
use crate::VirtualFileSystem;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// An in-memory file system implementation.
///
/// All files are stored in memory using a `BTreeMap` keyed by normalized
/// path, making it suitable for testing include chains without disk access.
/// Directories exist implicitly: a path is a directory when some file lives
/// below it.
///
/// # Example
/// ```
/// use lcfg_vfs::{MemoryFileSystem, VirtualFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new();
/// fs.write_file(Path::new("/conf/base.cfg"), b"debug = false;").unwrap();
/// assert!(fs.is_dir(Path::new("/conf")));
/// assert_eq!(fs.read_file(Path::new("/conf/base.cfg")).unwrap(), b"debug = false;");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
    files: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryFileSystem {
    /// Create a new empty memory file system.
    pub fn new() -> Self {
        Self {
            files: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Create a new memory file system pre-populated with files.
    ///
    /// # Arguments
    /// * `files` - Iterator of (path, content) tuples
    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: AsRef<str>,
    {
        let map = files
            .into_iter()
            .map(|(path, content)| (Self::key(Path::new(path.as_ref())), content))
            .collect();
        Self {
            files: Arc::new(RwLock::new(map)),
        }
    }

    /// Number of stored files
    pub fn len(&self) -> usize {
        self.files.read().map(|files| files.len()).unwrap_or(0)
    }

    /// Whether no files are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage key: lexically normalized, forward slashes only.
    fn key(path: &Path) -> String {
        normalize(path).to_string_lossy().replace('\\', "/")
    }

    fn poisoned() -> VfsError {
        VfsError::Io {
            message: String::from("Lock poisoned"),
        }
    }
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualFileSystem for MemoryFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let key = Self::key(path);
        let files = self.files.read().map_err(|_| Self::poisoned())?;

        files
            .get(&key)
            .cloned()
            .ok_or(VfsError::NotFound { path: key })
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()> {
        let key = Self::key(path);
        if self.is_dir(path) {
            return Err(VfsError::InvalidPath {
                path: key,
                reason: String::from("is a directory"),
            });
        }
        let mut files = self.files.write().map_err(|_| Self::poisoned())?;
        files.insert(key, content.to_vec());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        let key = Self::key(path);
        match self.files.read() {
            Ok(files) => files.contains_key(&key),
            Err(_) => false,
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        let mut prefix = Self::key(path);
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        match self.files.read() {
            Ok(files) => files
                .range(prefix.clone()..)
                .next()
                .map(|(key, _)| key.starts_with(&prefix))
                .unwrap_or(false),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_new_fs_is_empty() {
        let fs = MemoryFileSystem::new();
        assert!(fs.is_empty());
        assert!(!fs.exists(Path::new("/anything.cfg")));
    }

    #[test]
    fn test_write_and_read() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/app.cfg");

        fs.write_file(path, b"name = \"app\";").unwrap();

        assert_eq!(fs.read_file(path).unwrap(), b"name = \"app\";");
        assert_eq!(fs.len(), 1);
    }

    #[test]
    fn test_empty_content() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/empty.cfg");

        fs.write_file(path, b"").unwrap();
        assert!(fs.read_file(path).unwrap().is_empty());
    }

    #[test]
    fn test_overwrite_file() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/overwrite.cfg");

        fs.write_file(path, b"first").unwrap();
        fs.write_file(path, b"second").unwrap();

        assert_eq!(fs.read_file(path).unwrap(), b"second");
    }

    #[test]
    fn test_read_nonexistent() {
        let fs = MemoryFileSystem::new();
        let result = fs.read_file(Path::new("/nonexistent.cfg"));

        assert!(matches!(result.unwrap_err(), VfsError::NotFound { .. }));
    }

    #[test]
    fn test_paths_are_normalized() {
        let fs = MemoryFileSystem::with_files([("/conf/./a.cfg", b"a".to_vec())]);

        assert!(fs.is_file(Path::new("/conf/a.cfg")));
        assert!(fs.is_file(Path::new("/conf/sub/../a.cfg")));
        assert_eq!(fs.read_file(Path::new("/conf/a.cfg")).unwrap(), b"a");
    }

    #[test]
    fn test_implicit_directories() {
        let fs = MemoryFileSystem::new();
        fs.write_file(Path::new("/etc/app/main.cfg"), b"x").unwrap();

        assert!(fs.is_dir(Path::new("/etc")));
        assert!(fs.is_dir(Path::new("/etc/app")));
        assert!(fs.is_dir(Path::new("/etc/app/")));
        assert!(!fs.is_dir(Path::new("/etc/ap")));
        assert!(!fs.is_dir(Path::new("/etc/app/main.cfg")));
        assert!(fs.exists(Path::new("/etc/app")));
        assert!(!fs.is_file(Path::new("/etc/app")));
    }

    #[test]
    fn test_write_over_directory_fails() {
        let fs = MemoryFileSystem::new();
        fs.write_file(Path::new("/conf/a.cfg"), b"x").unwrap();

        let err = fs.write_file(Path::new("/conf"), b"y").unwrap_err();
        assert!(matches!(err, VfsError::InvalidPath { .. }));
    }

    #[test]
    fn test_clone_shares_data() {
        let fs1 = MemoryFileSystem::new();
        let path = Path::new("/shared.cfg");
        fs1.write_file(path, b"shared").unwrap();

        let fs2 = fs1.clone();
        fs2.write_file(path, b"modified").unwrap();

        assert_eq!(fs1.read_file(path).unwrap(), b"modified");
    }

    #[test]
    fn test_concurrent_reads() {
        let fs = MemoryFileSystem::with_files([("/test.cfg", b"concurrent".to_vec())]);
        let mut handles = vec![];

        for _ in 0..8 {
            let fs_clone = fs.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    let content = fs_clone.read_file(Path::new("/test.cfg")).unwrap();
                    assert_eq!(content, b"concurrent");
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
