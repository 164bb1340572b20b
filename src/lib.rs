//! lcfg - libconfig-style structured configuration files
//!
//! Parse, query, edit and write hierarchical configuration made of groups,
//! lists, arrays and typed scalars, with `@include` expansion.
//!
//! # Architecture
//!
//! ```text
//! lcfg-config/  - Configuration data structures (no logic)
//! lcfg-vfs/     - File access (native and in-memory)
//! lcfg-core/    - Lexer, include resolver, parser, settings tree, serializer
//! lcfg-api/     - load/save entry points, unified errors
//! lcfg-cli/     - `lcfg` command line tool
//! ```
//!
//! # Quick Start
//!
//! ```
//! let mut doc = lcfg::load_string("app = { port = 8080; hosts = [\"a\", \"b\"]; };").unwrap();
//! assert_eq!(doc.lookup("app.port").unwrap().as_int().unwrap(), 8080);
//!
//! doc.set("app.port", 9090).unwrap();
//! assert!(lcfg::to_string(&doc).contains("port = 9090;"));
//! ```

pub use lcfg_api::*;

// 各层 crate，供需要底层接口的使用者
pub use lcfg_config as config;
pub use lcfg_core as core;
pub use lcfg_vfs as vfs;
