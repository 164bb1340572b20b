//! 规范文本输出
//!
//! 每行一个 `name = value;`，分组展开为多行；列表和数组在放得下时内联，
//! 否则每行一个元素。输出总能被重新解析为结构相等的文档。

use crate::tree::{Document, Setting, SettingType, Value};
use lcfg_config::{FormatConfig, IntFormat};
use std::fmt::Write;
use tracing::{debug, instrument};

const TARGET: &str = "lcfg::format";

/// 文档序列化器
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    config: FormatConfig,
}

impl Serializer {
    pub fn new(config: &FormatConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 序列化整个文档
    #[instrument(target = "lcfg::format", skip_all)]
    pub fn serialize(&self, document: &Document) -> String {
        let mut out = String::new();
        for child in document.root().children() {
            self.write_setting(&mut out, child, 0);
        }
        debug!(target: TARGET, bytes = out.len(), "Serialized document");
        out
    }

    /// 序列化单个设置的值（聚合设置按根层级展开）
    pub fn serialize_value(&self, setting: Setting<'_>) -> String {
        let mut out = String::new();
        self.write_value(&mut out, setting, 0, 0, 0);
        out
    }

    fn indent(&self, out: &mut String, level: usize) {
        out.extend(std::iter::repeat(' ').take(level * self.config.indent_width));
    }

    fn write_setting(&self, out: &mut String, setting: Setting<'_>, level: usize) {
        let name = setting.name().unwrap_or_default();
        self.indent(out, level);
        out.push_str(name);
        out.push_str(" = ");
        let column = level * self.config.indent_width + name.len() + 3;
        self.write_value(out, setting, level, column, 1);
        out.push_str(";\n");
    }

    /// `column` 为值起始列，`suffix` 为值之后紧跟的字符数
    fn write_value(&self, out: &mut String, setting: Setting<'_>, level: usize, column: usize, suffix: usize) {
        match setting.setting_type() {
            SettingType::Group => {
                if setting.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push_str("{\n");
                for child in setting.children() {
                    self.write_setting(out, child, level + 1);
                }
                self.indent(out, level);
                out.push('}');
            }
            SettingType::List | SettingType::Array => {
                let (open, close) = brackets(setting.setting_type());
                if let Some(inline) = self.inline(setting) {
                    if column + inline.len() + suffix <= self.config.max_inline_width {
                        out.push_str(&inline);
                        return;
                    }
                }
                out.push(open);
                out.push('\n');
                let count = setting.len();
                for (i, child) in setting.children().enumerate() {
                    self.indent(out, level + 1);
                    let last = i + 1 == count;
                    let child_column = (level + 1) * self.config.indent_width;
                    self.write_value(out, child, level + 1, child_column, usize::from(!last));
                    if !last {
                        out.push(',');
                    }
                    out.push('\n');
                }
                self.indent(out, level);
                out.push(close);
            }
            _ => {
                if let Some(value) = setting.value() {
                    self.write_scalar(out, value, setting.format());
                }
            }
        }
    }

    /// 单行形式；含非空分组时返回 None
    fn inline(&self, setting: Setting<'_>) -> Option<String> {
        match setting.setting_type() {
            SettingType::Group if setting.is_empty() => Some("{}".to_string()),
            SettingType::Group => None,
            SettingType::List | SettingType::Array => {
                let (open, close) = brackets(setting.setting_type());
                let parts = setting
                    .children()
                    .map(|child| self.inline(child))
                    .collect::<Option<Vec<_>>>()?;
                Some(format!("{}{}{}", open, parts.join(", "), close))
            }
            _ => {
                let mut out = String::new();
                self.write_scalar(&mut out, setting.value()?, setting.format());
                Some(out)
            }
        }
    }

    fn write_scalar(&self, out: &mut String, value: &Value, format: IntFormat) {
        match value {
            Value::Integer(v) if format == IntFormat::Hex && *v >= 0 => {
                let _ = write!(out, "0x{:X}", v);
            }
            Value::Integer(v) => {
                let _ = write!(out, "{}", v);
            }
            Value::Int64(v) if format == IntFormat::Hex && *v >= 0 => {
                let _ = write!(out, "0x{:X}L", v);
            }
            Value::Int64(v) => {
                let _ = write!(out, "{}L", v);
            }
            Value::Float(v) => out.push_str(&self.format_float(*v)),
            Value::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            Value::String(s) => escape_string(out, s),
        }
    }

    /// 浮点数总带 `.` 或指数，保证重新解析仍为浮点
    fn format_float(&self, value: f64) -> String {
        let text = match self.config.float_precision {
            Some(precision) => format!("{:.*}", precision, value),
            None => format!("{:?}", value),
        };
        if text.contains(['.', 'e', 'E']) {
            text
        } else {
            text + ".0"
        }
    }
}

fn brackets(setting_type: SettingType) -> (char, char) {
    match setting_type {
        SettingType::Array => ('[', ']'),
        _ => ('(', ')'),
    }
}

fn escape_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0c' => out.push_str("\\f"),
            c if c.is_control() => {
                // 逐字节转义，重新解析时按 UTF-8 拼回
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    let _ = write!(out, "\\x{:02X}", byte);
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
