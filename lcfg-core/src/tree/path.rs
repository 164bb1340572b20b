//! 设置路径解析
//!
//! 语法：`a.b[2].c`，同时接受 `a.b.[2]` 与开头的 `[n]`。空串表示起点本身。

use super::error::SettingError;
use crate::lexer::{is_identifier_continue, is_identifier_start};

/// 路径段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Name(String),
    Index(usize),
}

/// 解析路径字符串
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, SettingError> {
    let invalid = |reason: &str| SettingError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let chars: Vec<char> = path.chars().collect();
    let mut segments = Vec::new();
    let mut i = 0;
    // 位于开头或 '.' 之后
    let mut after_separator = true;

    while i < chars.len() {
        let c = chars[i];
        if c == '[' {
            let close = chars[i..]
                .iter()
                .position(|&c| c == ']')
                .map(|p| i + p)
                .ok_or_else(|| invalid("unclosed '['"))?;
            let digits: String = chars[i + 1..close].iter().collect();
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid("index must be a non-negative integer"));
            }
            let index = digits.parse().map_err(|_| invalid("index too large"))?;
            segments.push(PathSegment::Index(index));
            after_separator = false;
            i = close + 1;
        } else if c == '.' {
            if after_separator {
                return Err(invalid("empty path segment"));
            }
            after_separator = true;
            i += 1;
        } else if after_separator && is_identifier_start(c) {
            let start = i;
            while i < chars.len() && is_identifier_continue(chars[i]) {
                i += 1;
            }
            segments.push(PathSegment::Name(chars[start..i].iter().collect()));
            after_separator = false;
        } else {
            return Err(invalid(&format!("unexpected character '{}'", c)));
        }
    }

    if after_separator && !segments.is_empty() {
        return Err(invalid("path ends with '.'"));
    }
    Ok(segments)
}

/// 按路径段生成规范路径字符串
pub fn format_path(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            PathSegment::Name(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            PathSegment::Index(index) => {
                out.push_str(&format!("[{}]", index));
            }
        }
    }
    out
}

/// 名称是否合法：`[A-Za-z*][-A-Za-z0-9_*]*`，且不是布尔字面量
pub fn is_valid_name(name: &str) -> bool {
    // 词法上 true/false 总是布尔值，不能再作为名称读回
    if name.eq_ignore_ascii_case("true") || name.eq_ignore_ascii_case("false") {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_identifier_start(c) => chars.all(is_identifier_continue),
        _ => false,
    }
}
