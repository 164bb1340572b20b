//! 子命令实现
//!
//! 每个命令返回要写到 stdout 的文本，main 负责打印与退出码。

use lcfg_api::{
    load_file_with, save_file_with, to_string_with, Document, IntFormat, LcfgError, LoadConfig, Setting,
    SettingError, SettingType, Value,
};
use lcfg_core::tree::path::{format_path, parse_path, PathSegment};
use lcfg_core::Serializer;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

const TARGET: &str = "lcfg::cli";

/// CLI 错误
#[derive(Debug)]
pub enum CliError {
    /// 加载、查找或保存失败（带位置信息）
    Config(LcfgError),
    /// 参数或值不合法
    Message(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "{}", e),
            CliError::Message(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<LcfgError> for CliError {
    fn from(e: LcfgError) -> Self {
        CliError::Config(e)
    }
}

impl From<SettingError> for CliError {
    fn from(e: SettingError) -> Self {
        CliError::Config(e.into())
    }
}

pub type CliResult<T> = Result<T, CliError>;

/// `get` 的输出内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetMode {
    Value,
    Type,
    Count,
}

pub fn check(file: &Path, config: &LoadConfig) -> CliResult<String> {
    let doc = load_file_with(file, config)?;
    let count = doc.node_count().saturating_sub(1);
    info!(target: TARGET, settings = count, "Configuration is valid");
    Ok(format!("{}: OK ({} settings)\n", file.display(), count))
}

pub fn get(file: &Path, path: &str, mode: GetMode, config: &LoadConfig) -> CliResult<String> {
    let doc = load_file_with(file, config)?;
    let setting = doc.lookup(path)?;
    let out = match mode {
        GetMode::Type => setting.setting_type().to_string(),
        GetMode::Count => setting.len().to_string(),
        GetMode::Value => render(setting, config),
    };
    Ok(out + "\n")
}

pub fn set(file: &Path, path: &str, text: &str, kind: Option<SettingType>, config: &LoadConfig) -> CliResult<String> {
    let mut doc = load_file_with(file, config)?;
    let existing = doc.lookup(path).map(|s| (s.id(), s.setting_type()));

    let id = match existing {
        Ok((_, found)) if found.is_aggregate() => {
            return Err(CliError::Message(format!(
                "Cannot assign a value to {} setting '{}'",
                found, path
            )));
        }
        Ok((id, found)) => {
            let value = parse_value(text, kind.unwrap_or(found))?;
            doc.set_value(id, value)?;
            id
        }
        Err(SettingError::NotFound { .. }) => {
            let segments = parse_path(path)?;
            let Some((PathSegment::Name(name), parent)) = segments.split_last() else {
                return Err(CliError::Message(format!(
                    "Only named group members can be created: '{}'",
                    path
                )));
            };
            let kind = kind.unwrap_or_else(|| infer_kind(text));
            let value = parse_value(text, kind)?;
            let id = doc.add(&format_path(parent), Some(name.as_str()), kind)?;
            doc.set_value(id, value)?;
            id
        }
        Err(e) => return Err(e.into()),
    };

    if is_hex(text) {
        doc.set_format(id, IntFormat::Hex)?;
    }
    debug!(target: TARGET, path, "Writing updated configuration");
    save_file_with(&doc, file, config)?;
    Ok(String::new())
}

pub fn remove(file: &Path, path: &str, config: &LoadConfig) -> CliResult<String> {
    let mut doc = load_file_with(file, config)?;
    doc.remove(path)?;
    save_file_with(&doc, file, config)?;
    Ok(String::new())
}

pub fn fmt(file: &Path, write: bool, config: &LoadConfig) -> CliResult<String> {
    let doc = load_file_with(file, config)?;
    if write {
        save_file_with(&doc, file, config)?;
        return Ok(String::new());
    }
    Ok(to_string_with(&doc, config))
}

pub fn dump(file: &Path, config: &LoadConfig) -> CliResult<String> {
    let doc = load_file_with(file, config)?;
    let json = serde_json::to_string_pretty(&doc).map_err(|e| CliError::Message(e.to_string()))?;
    Ok(json + "\n")
}

pub fn list(file: &Path, path: Option<&str>, config: &LoadConfig) -> CliResult<String> {
    let doc = load_file_with(file, config)?;
    list_children(&doc, path.unwrap_or(""), config)
}

fn list_children(doc: &Document, path: &str, config: &LoadConfig) -> CliResult<String> {
    let setting = doc.lookup(path)?;
    if setting.is_scalar() {
        return Err(SettingError::NotAggregate { path: setting.path() }.into());
    }

    let rows: Vec<(String, String, String, String)> = setting
        .children()
        .enumerate()
        .map(|(i, child)| {
            let detail = if child.is_aggregate() {
                format!("{} items", child.len())
            } else {
                Serializer::new(config.format()).serialize_value(child)
            };
            (
                i.to_string(),
                child.name().unwrap_or("-").to_string(),
                child.setting_type().to_string(),
                detail,
            )
        })
        .collect();

    let name_width = rows.iter().map(|row| row.1.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (index, name, kind, detail) in rows {
        out.push_str(&format!("{:>3}  {:<name_width$}  {:<6}  {}\n", index, name, kind, detail));
    }
    Ok(out)
}

/// 字符串输出原文，其余按规范文本
fn render(setting: Setting<'_>, config: &LoadConfig) -> String {
    match setting.value() {
        Some(Value::String(s)) => s.clone(),
        _ => Serializer::new(config.format()).serialize_value(setting),
    }
}

fn is_hex(text: &str) -> bool {
    text.starts_with("0x") || text.starts_with("0X")
}

/// 解析整数：十进制可带一个符号，十六进制不带符号，可带 `L`/`LL` 后缀
fn parse_integer(text: &str) -> Option<i64> {
    let body = text
        .strip_suffix("LL")
        .or_else(|| text.strip_suffix('L'))
        .unwrap_or(text);
    if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        // 超过 i64::MAX 的十六进制按位重解释
        return u64::from_str_radix(hex, 16).ok().map(|v| v as i64);
    }
    let digits = body.strip_prefix(['-', '+']).unwrap_or(body);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    body.parse::<i64>().ok()
}

/// 未指定类型时按值的写法推断
pub fn infer_kind(text: &str) -> SettingType {
    if text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false") {
        return SettingType::Bool;
    }
    if let Some(v) = parse_integer(text) {
        if !text.ends_with('L') && i32::try_from(v).is_ok() {
            return SettingType::Integer;
        }
        return SettingType::Int64;
    }
    if text.contains(['.', 'e', 'E']) && text.parse::<f64>().is_ok_and(f64::is_finite) {
        return SettingType::Float;
    }
    SettingType::String
}

/// 按目标类型解析命令行上的值
pub fn parse_value(text: &str, kind: SettingType) -> CliResult<Value> {
    let invalid = || CliError::Message(format!("'{}' is not a valid {} value", text, kind));
    match kind {
        SettingType::String => Ok(Value::String(text.to_string())),
        SettingType::Integer => parse_integer(text)
            .and_then(|v| i32::try_from(v).ok())
            .map(Value::Integer)
            .ok_or_else(invalid),
        SettingType::Int64 => parse_integer(text).map(Value::Int64).ok_or_else(invalid),
        SettingType::Float => text
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Value::Float)
            .ok_or_else(invalid),
        SettingType::Bool => match text.to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
        SettingType::Group | SettingType::List | SettingType::Array => Err(CliError::Message(format!(
            "Cannot create a {} from the command line",
            kind
        ))),
    }
}
