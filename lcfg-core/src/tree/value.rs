//! 设置类型与标量值

use std::fmt;

/// 设置节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingType {
    Group,
    List,
    Array,
    String,
    Integer,
    Int64,
    Float,
    Bool,
}

impl SettingType {
    /// 聚合类型（可拥有子节点）
    pub fn is_aggregate(self) -> bool {
        matches!(self, SettingType::Group | SettingType::List | SettingType::Array)
    }

    pub fn is_scalar(self) -> bool {
        !self.is_aggregate()
    }

    pub fn is_number(self) -> bool {
        matches!(
            self,
            SettingType::Integer | SettingType::Int64 | SettingType::Float
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SettingType::Group => "group",
            SettingType::List => "list",
            SettingType::Array => "array",
            SettingType::String => "string",
            SettingType::Integer => "int",
            SettingType::Int64 => "int64",
            SettingType::Float => "float",
            SettingType::Bool => "bool",
        }
    }

    /// 标量类型的默认值；聚合类型返回 None
    pub fn default_value(self) -> Option<Value> {
        match self {
            SettingType::String => Some(Value::String(String::new())),
            SettingType::Integer => Some(Value::Integer(0)),
            SettingType::Int64 => Some(Value::Int64(0)),
            SettingType::Float => Some(Value::Float(0.0)),
            SettingType::Bool => Some(Value::Bool(false)),
            SettingType::Group | SettingType::List | SettingType::Array => None,
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 标量值
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i32),
    Int64(i64),
    Float(f64),
    Bool(bool),
    String(String),
}

impl Value {
    pub fn setting_type(&self) -> SettingType {
        match self {
            Value::Integer(_) => SettingType::Integer,
            Value::Int64(_) => SettingType::Int64,
            Value::Float(_) => SettingType::Float,
            Value::Bool(_) => SettingType::Bool,
            Value::String(_) => SettingType::String,
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

/// 可从标量值中按类型精确取出的 Rust 类型（不做任何转换）
pub trait FromValue: Sized {
    const TYPE: SettingType;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for i32 {
    const TYPE: SettingType = SettingType::Integer;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    const TYPE: SettingType = SettingType::Int64;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    const TYPE: SettingType = SettingType::Float;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const TYPE: SettingType = SettingType::Bool;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for String {
    const TYPE: SettingType = SettingType::String;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(v) => Some(v.clone()),
            _ => None,
        }
    }
}
