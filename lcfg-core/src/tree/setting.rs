//! 设置的只读借用视图

use super::document::{Document, Node, NodeKind, SettingId};
use super::error::SettingError;
use super::value::{FromValue, SettingType, Value};
use lcfg_config::IntFormat;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;

/// 文档中某个设置的借用视图
#[derive(Clone, Copy)]
pub struct Setting<'a> {
    doc: &'a Document,
    id: SettingId,
    node: &'a Node,
}

impl<'a> Setting<'a> {
    pub(crate) fn new(doc: &'a Document, id: SettingId, node: &'a Node) -> Self {
        Self { doc, id, node }
    }

    pub fn id(&self) -> SettingId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// 名称（列表/数组元素与根为 None）
    pub fn name(&self) -> Option<&'a str> {
        self.node.name.as_deref()
    }

    pub fn setting_type(&self) -> SettingType {
        self.node.kind.setting_type()
    }

    pub fn is_root(&self) -> bool {
        self.node.parent.is_none()
    }

    pub fn is_group(&self) -> bool {
        self.setting_type() == SettingType::Group
    }

    pub fn is_aggregate(&self) -> bool {
        self.setting_type().is_aggregate()
    }

    pub fn is_scalar(&self) -> bool {
        self.setting_type().is_scalar()
    }

    /// 子设置数量；标量为 0
    pub fn len(&self) -> usize {
        self.node.kind.children().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn parent(&self) -> Option<Setting<'a>> {
        self.node
            .parent
            .and_then(|parent| self.doc.setting(parent).ok())
    }

    /// 在父设置中的位置
    pub fn index(&self) -> Option<usize> {
        let parent = self.parent()?;
        parent
            .node
            .kind
            .children()
            .iter()
            .position(|child| *child == self.id)
    }

    /// 按顺序遍历子设置
    pub fn children(&self) -> impl Iterator<Item = Setting<'a>> + 'a {
        let doc = self.doc;
        self.node
            .kind
            .children()
            .iter()
            .filter_map(move |child| doc.setting(*child).ok())
    }

    /// 第 i 个子设置
    pub fn get(&self, index: usize) -> Result<Setting<'a>, SettingError> {
        if self.is_scalar() {
            return Err(SettingError::NotAggregate { path: self.path() });
        }
        let children = self.node.kind.children();
        children
            .get(index)
            .and_then(|child| self.doc.setting(*child).ok())
            .ok_or_else(|| SettingError::IndexOutOfRange {
                path: self.path(),
                index,
                len: children.len(),
            })
    }

    /// 分组成员
    pub fn member(&self, name: &str) -> Option<Setting<'a>> {
        match &self.node.kind {
            NodeKind::Group { by_name, .. } => by_name
                .get(name)
                .and_then(|child| self.doc.setting(*child).ok()),
            _ => None,
        }
    }

    /// 相对于本设置查找路径
    pub fn lookup(&self, path: &str) -> Result<Setting<'a>, SettingError> {
        let id = self.doc.resolve(self.id, path)?;
        self.doc.setting(id)
    }

    /// 规范路径，如 `servers[0].name`；根为空串
    pub fn path(&self) -> String {
        let mut parts = Vec::new();
        let mut current = *self;
        while let Some(parent) = current.parent() {
            match (parent.setting_type(), current.name()) {
                (SettingType::Group, Some(name)) => parts.push(name.to_string()),
                _ => parts.push(format!("[{}]", current.index().unwrap_or_default())),
            }
            current = parent;
        }
        let mut out = String::new();
        for part in parts.iter().rev() {
            if !out.is_empty() && !part.starts_with('[') {
                out.push('.');
            }
            out.push_str(part);
        }
        out
    }

    /// 源文件中的行号；非解析产生的设置为 0
    pub fn source_line(&self) -> usize {
        self.node.source_line
    }

    pub fn source_file(&self) -> Option<&'a Path> {
        self.node.source_file.as_deref()
    }

    pub fn format(&self) -> IntFormat {
        self.node.format
    }

    /// 标量值
    pub fn value(&self) -> Option<&'a Value> {
        match &self.node.kind {
            NodeKind::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// 按类型精确取值
    pub fn value_as<T: FromValue>(&self) -> Result<T, SettingError> {
        self.value()
            .and_then(T::from_value)
            .ok_or_else(|| self.wrong_type(T::TYPE))
    }

    pub fn as_string(&self) -> Result<&'a str, SettingError> {
        match self.value() {
            Some(Value::String(s)) => Ok(s),
            _ => Err(self.wrong_type(SettingType::String)),
        }
    }

    pub fn as_int(&self) -> Result<i32, SettingError> {
        self.value_as()
    }

    pub fn as_int64(&self) -> Result<i64, SettingError> {
        self.value_as()
    }

    pub fn as_float(&self) -> Result<f64, SettingError> {
        self.value_as()
    }

    pub fn as_bool(&self) -> Result<bool, SettingError> {
        self.value_as()
    }

    fn wrong_type(&self, expected: SettingType) -> SettingError {
        SettingError::WrongType {
            path: self.path(),
            expected,
            found: self.setting_type(),
        }
    }
}

impl PartialEq for Setting<'_> {
    /// 结构相等，忽略源位置与格式
    fn eq(&self, other: &Self) -> bool {
        if self.name() != other.name() || self.len() != other.len() {
            return false;
        }
        match (&self.node.kind, &other.node.kind) {
            (NodeKind::Scalar(a), NodeKind::Scalar(b)) => a == b,
            (a, b) if a.setting_type() == b.setting_type() => {
                self.children().zip(other.children()).all(|(x, y)| x == y)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Setting<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setting")
            .field("path", &self.path())
            .field("type", &self.setting_type())
            .field("value", &self.value())
            .finish()
    }
}

impl Serialize for Setting<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.node.kind {
            NodeKind::Scalar(Value::Integer(v)) => serializer.serialize_i32(*v),
            NodeKind::Scalar(Value::Int64(v)) => serializer.serialize_i64(*v),
            NodeKind::Scalar(Value::Float(v)) => serializer.serialize_f64(*v),
            NodeKind::Scalar(Value::Bool(v)) => serializer.serialize_bool(*v),
            NodeKind::Scalar(Value::String(v)) => serializer.serialize_str(v),
            NodeKind::Group { .. } => {
                let mut map = serializer.serialize_map(Some(self.len()))?;
                for child in self.children() {
                    map.serialize_entry(child.name().unwrap_or_default(), &child)?;
                }
                map.end()
            }
            NodeKind::List(_) | NodeKind::Array(_) => {
                let mut seq = serializer.serialize_seq(Some(self.len()))?;
                for child in self.children() {
                    seq.serialize_element(&child)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut doc = Document::new();
        let servers = doc.add("", Some("servers"), SettingType::List).unwrap();
        let first = doc.add_child(servers, None, SettingType::Group).unwrap();
        let name = doc.add_child(first, Some("name"), SettingType::String).unwrap();
        doc.set_value(name, "alpha").unwrap();
        let port = doc.add_child(first, Some("port"), SettingType::Integer).unwrap();
        doc.set_value(port, 8080).unwrap();
        let ratio = doc.add("", Some("ratio"), SettingType::Float).unwrap();
        doc.set_value(ratio, 0.5).unwrap();
        doc
    }

    #[test]
    fn test_path_round_trip() {
        let doc = sample();
        let port = doc.lookup("servers.[0].port").unwrap();
        assert_eq!(port.path(), "servers[0].port");
        assert_eq!(doc.lookup(&port.path()).unwrap().id(), port.id());
        assert_eq!(doc.root().path(), "");
    }

    #[test]
    fn test_parent_and_index() {
        let doc = sample();
        let port = doc.lookup("servers[0].port").unwrap();
        assert_eq!(port.index(), Some(1));
        let group = port.parent().unwrap();
        assert_eq!(group.index(), Some(0));
        assert_eq!(group.name(), None);
        assert!(doc.root().parent().is_none());
    }

    #[test]
    fn test_relative_lookup() {
        let doc = sample();
        let server = doc.lookup("servers[0]").unwrap();
        assert_eq!(server.lookup("name").unwrap().as_string().unwrap(), "alpha");
        assert_eq!(server.member("port").unwrap().as_int().unwrap(), 8080);
        assert!(server.member("missing").is_none());
    }

    #[test]
    fn test_get_by_index() {
        let doc = sample();
        let servers = doc.lookup("servers").unwrap();
        assert_eq!(servers.get(0).unwrap().len(), 2);
        assert!(matches!(
            servers.get(1),
            Err(SettingError::IndexOutOfRange { index: 1, len: 1, .. })
        ));
        let ratio = doc.lookup("ratio").unwrap();
        assert!(matches!(ratio.get(0), Err(SettingError::NotAggregate { .. })));
    }

    #[test]
    fn test_typed_accessors() {
        let doc = sample();
        let ratio = doc.lookup("ratio").unwrap();
        assert_eq!(ratio.as_float().unwrap(), 0.5);
        assert!(matches!(
            ratio.as_int(),
            Err(SettingError::WrongType {
                expected: SettingType::Integer,
                found: SettingType::Float,
                ..
            })
        ));
        assert!(doc.lookup("servers").unwrap().as_string().is_err());
    }

    #[test]
    fn test_children_order() {
        let doc = sample();
        let names: Vec<_> = doc.root().children().filter_map(|s| s.name()).collect();
        assert_eq!(names, vec!["servers", "ratio"]);
    }

    #[test]
    fn test_serialize_json() {
        let doc = sample();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "servers": [{ "name": "alpha", "port": 8080 }],
                "ratio": 0.5
            })
        );
    }
}
