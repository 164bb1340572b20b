//! 设置树修改与并发读取测试

mod common;

use common::{canonical, parse};
use lcfg_core::{IntFormat, SettingError, SettingType};
use std::sync::RwLock;

#[test]
fn test_edit_then_serialize() {
    let mut doc = parse("server = { port = 80; };").unwrap();
    doc.set("server.port", 8080).unwrap();
    let host = doc.add("server", Some("host"), SettingType::String).unwrap();
    doc.set_value(host, "example.org").unwrap();
    let mask = doc.add("", Some("mask"), SettingType::Integer).unwrap();
    doc.set_value(mask, 255).unwrap();
    doc.set_format(mask, IntFormat::Hex).unwrap();

    assert_eq!(
        canonical(&doc),
        "server = {\n  port = 8080;\n  host = \"example.org\";\n};\nmask = 0xFF;\n"
    );
}

#[test]
fn test_remove_then_lookup() {
    let mut doc = parse("a = { b = { c = 1; }; d = 2; };").unwrap();
    let c = doc.lookup("a.b.c").unwrap().id();
    let d = doc.lookup("a.d").unwrap().id();
    doc.remove("a.b").unwrap();

    assert!(matches!(doc.lookup("a.b.c"), Err(SettingError::NotFound { .. })));
    assert_eq!(doc.setting(c).unwrap_err(), SettingError::StaleHandle);
    assert_eq!(doc.setting(d).unwrap().as_int().unwrap(), 2);
    assert_eq!(doc.lookup("a.[0]").unwrap().name(), Some("d"));
}

#[test]
fn test_setting_paths_after_parse() {
    let doc = parse("list = ( { inner = [1, 2]; } );").unwrap();
    let two = doc.lookup("list.[0].inner.[1]").unwrap();
    assert_eq!(two.path(), "list[0].inner[1]");
    assert_eq!(two.index(), Some(1));
    assert_eq!(two.parent().unwrap().name(), Some("inner"));
}

#[test]
fn test_concurrent_reads() {
    let doc = parse("a = 1; b = { c = \"x\"; }; d = [1, 2, 3];").unwrap();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..100 {
                    assert_eq!(doc.get::<i32>("a").unwrap(), 1);
                    assert_eq!(doc.get::<String>("b.c").unwrap(), "x");
                    assert_eq!(doc.lookup("d").unwrap().len(), 3);
                }
            });
        }
    });
}

#[test]
fn test_writer_lock_around_document() {
    let doc = RwLock::new(parse("counter = 0;").unwrap());
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let mut guard = doc.write().unwrap();
                let current = guard.get::<i32>("counter").unwrap();
                guard.set("counter", current + 1).unwrap();
            });
        }
    });
    assert_eq!(doc.read().unwrap().get::<i32>("counter").unwrap(), 4);
}

#[test]
fn test_json_dump() {
    let doc = parse("name = \"x\"; ports = [1, 2]; nested = { ok = true; big = 5L; };").unwrap();
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "name": "x",
            "ports": [1, 2],
            "nested": { "ok": true, "big": 5 }
        })
    );
}
