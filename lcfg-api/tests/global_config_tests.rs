//! 全局配置测试
//!
//! 全局单例按进程共享，因此单独放在一个测试二进制中。

use lcfg_api::{get_config, init_config, is_initialized, load_string, to_string, LoadConfig};
use std::path::PathBuf;

#[test]
fn test_convenience_calls_do_not_initialize_global() {
    assert!(!is_initialized());
    let doc = load_string("a = 1;").unwrap();
    assert_eq!(to_string(&doc), "a = 1;\n");
    assert!(get_config().search_paths.is_empty());
    assert!(!is_initialized());

    assert!(init_config(LoadConfig::default().with_search_paths(["/etc/app"])).is_ok());
    assert!(is_initialized());
    assert_eq!(get_config().search_paths, vec![PathBuf::from("/etc/app")]);
}
