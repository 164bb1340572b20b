//! `@include` 端到端测试

mod common;

use common::{create_test_fs, parse_entry};
use lcfg_core::{Error, IncludeError, IncludeErrorKind, ParseConfig};
use std::path::Path;

#[test]
fn test_include_relative_to_including_file() {
    let fs = create_test_fs(vec![
        ("/etc/app/main.cfg", "name = \"app\";\n@include \"conf.d/db.cfg\"\nport = 80;"),
        ("/etc/app/conf.d/db.cfg", "db = { host = \"localhost\"; };"),
    ]);
    let doc = parse_entry(&fs, "/etc/app/main.cfg", &ParseConfig::default()).unwrap();

    let names: Vec<_> = doc.root().children().filter_map(|s| s.name()).collect();
    assert_eq!(names, vec!["name", "db", "port"]);
    let host = doc.lookup("db.host").unwrap();
    assert_eq!(host.source_file(), Some(Path::new("/etc/app/conf.d/db.cfg")));
    assert_eq!(host.source_line(), 1);
}

#[test]
fn test_nested_includes() {
    let fs = create_test_fs(vec![
        ("/main.cfg", "@include \"a.cfg\""),
        ("/a.cfg", "a = 1;\n@include \"b.cfg\""),
        ("/b.cfg", "b = 2;"),
    ]);
    let doc = parse_entry(&fs, "/main.cfg", &ParseConfig::default()).unwrap();
    assert_eq!(doc.get::<i32>("b").unwrap(), 2);
}

#[test]
fn test_include_inside_group() {
    let fs = create_test_fs(vec![
        ("/main.cfg", "server = {\n  @include \"server.cfg\"\n  extra = true;\n};"),
        ("/server.cfg", "host = \"h\"; port = 1;"),
    ]);
    let doc = parse_entry(&fs, "/main.cfg", &ParseConfig::default()).unwrap();
    assert_eq!(doc.lookup("server").unwrap().len(), 3);
}

#[test]
fn test_include_cycle() {
    let fs = create_test_fs(vec![
        ("/a.cfg", "a = 1;\n@include \"b.cfg\""),
        ("/b.cfg", "b = 1;\n@include \"a.cfg\""),
    ]);
    let err = parse_entry(&fs, "/a.cfg", &ParseConfig::default()).unwrap_err();
    match err {
        Error::Include(IncludeError {
            kind: IncludeErrorKind::Cycle { chain },
            ..
        }) => assert_eq!(chain, vec!["/a.cfg", "/b.cfg", "/a.cfg"]),
        other => panic!("expected Cycle, got {other:?}"),
    }
}

#[test]
fn test_missing_include_not_found() {
    let fs = create_test_fs(vec![("/main.cfg", "a = 1;\n@include \"missing.cfg\"\nb = 2;")]);
    let err = parse_entry(&fs, "/main.cfg", &ParseConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::Include(IncludeError {
            kind: IncludeErrorKind::NotFound { .. },
            ..
        })
    ));
    assert_eq!(err.line(), Some(2));
    assert_eq!(err.file(), Some(Path::new("/main.cfg")));
}

#[test]
fn test_missing_include_skip_mode() {
    let fs = create_test_fs(vec![("/main.cfg", "a = 1;\n@include \"missing.cfg\"\nb = 2;")]);
    let doc = parse_entry(&fs, "/main.cfg", &ParseConfig::skip_missing_includes()).unwrap();
    assert_eq!(doc.root().len(), 2);
    assert_eq!(doc.get::<i32>("b").unwrap(), 2);
}

#[test]
fn test_duplicate_across_files() {
    let fs = create_test_fs(vec![
        ("/main.cfg", "a = 1;\n@include \"dup.cfg\""),
        ("/dup.cfg", "\na = 2;"),
    ]);
    let err = parse_entry(&fs, "/main.cfg", &ParseConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert_eq!(err.file(), Some(Path::new("/dup.cfg")));
    assert_eq!(err.line(), Some(2));
}
