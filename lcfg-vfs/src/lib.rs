//! lcfg Virtual File System
//!
//! The file access layer behind `load_file`, `save_file` and `@include`
//! expansion. Configuration code never touches `std::fs` directly, so include
//! resolution can be exercised against an in-memory tree in tests.
//!
//! # Usage
//! ```rust
//! use lcfg_vfs::{MemoryFileSystem, VirtualFileSystem};
//! use std::path::Path;
//!
//! let fs = MemoryFileSystem::new();
//! fs.write_file(Path::new("/etc/app.cfg"), b"port = 8080;").unwrap();
//! let text = fs.read_to_string(Path::new("/etc/app.cfg")).unwrap();
//! assert_eq!(text, "port = 8080;");
//! ```

mod error;
mod memory;
mod native;
mod path;
mod r#trait;

pub use error::{VfsError, VfsResult};
pub use memory::MemoryFileSystem;
pub use native::NativeFileSystem;
pub use path::normalize;
pub use r#trait::VirtualFileSystem;
