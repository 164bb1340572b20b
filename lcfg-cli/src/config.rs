//! CLI 配置
//!
//! 包含 CLI 特有的配置：日志配置，以及选项文件与命令行参数的合并

use lcfg_api::{LcfgConfig, LoadConfig, MissingInclude, Phase};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

/// CLI 日志配置
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub global: LevelFilter,
    pub lexer: Option<LevelFilter>,
    pub include: Option<LevelFilter>,
    pub parser: Option<LevelFilter>,
    pub tree: Option<LevelFilter>,
    pub format: Option<LevelFilter>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: LevelFilter::WARN,
            lexer: None,
            include: None,
            parser: None,
            tree: None,
            format: None,
        }
    }
}

impl LogConfig {
    pub fn new(global: LevelFilter) -> Self {
        Self {
            global,
            ..Self::default()
        }
    }

    /// Get log level for a specific phase
    pub fn level_for(&self, phase: Phase) -> LevelFilter {
        let level = match phase {
            Phase::Lexer => self.lexer,
            Phase::Include => self.include,
            Phase::Parser => self.parser,
            Phase::Tree => self.tree,
            Phase::Format => self.format,
        };
        level.unwrap_or(self.global)
    }

    /// 应用 `phase=level` 形式的覆盖
    pub fn apply_override(&mut self, spec: &str) -> Result<(), String> {
        let (phase, level) = spec
            .split_once('=')
            .ok_or_else(|| format!("expected PHASE=LEVEL, got '{}'", spec))?;
        let level: LevelFilter = level
            .trim()
            .parse()
            .map_err(|_| format!("unknown log level '{}'", level))?;
        let slot = match phase.trim() {
            "lexer" => &mut self.lexer,
            "include" => &mut self.include,
            "parser" => &mut self.parser,
            "tree" => &mut self.tree,
            "format" => &mut self.format,
            other => return Err(format!("unknown phase '{}'", other)),
        };
        *slot = Some(level);
        Ok(())
    }
}

/// 读取 JSON 选项文件；缺省字段取默认值
pub fn read_options(path: Option<&Path>) -> Result<LcfgConfig, String> {
    let Some(path) = path else {
        return Ok(LcfgConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read options file '{}': {}", path.display(), e))?;
    LcfgConfig::from_json(&content)
        .map_err(|e| format!("Invalid options file '{}': {}", path.display(), e))
}

/// 命令行中与加载相关的覆盖项
#[derive(Debug, Clone, Default)]
pub struct LoadOverrides {
    pub include_dirs: Vec<PathBuf>,
    pub skip_missing: bool,
    pub indent: Option<usize>,
    pub width: Option<usize>,
}

/// 选项文件之上叠加命令行参数
pub fn build_load_config(mut options: LcfgConfig, overrides: &LoadOverrides) -> LoadConfig {
    if overrides.skip_missing {
        options.parse.missing_include = MissingInclude::Skip;
    }
    if let Some(indent) = overrides.indent {
        options.format.indent_width = indent;
    }
    if let Some(width) = overrides.width {
        options.format.max_inline_width = width;
    }
    LoadConfig::new(options).with_search_paths(overrides.include_dirs.iter().cloned())
}
