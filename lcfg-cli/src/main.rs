//! lcfg CLI - 命令行接口
//!
//! 检查、查询、修改与重新格式化配置文件

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;
use tracing::level_filters::LevelFilter;

mod commands;
mod config;
mod logging;
mod platform;

use crate::commands::{CliError, CliResult, GetMode};
use crate::config::{build_load_config, read_options, LogConfig, LoadOverrides};
use crate::logging::LogFormat;
use crate::platform::report_error;
use lcfg_api::{get_config, init_config, SettingType};

#[derive(Parser)]
#[command(
    name = "lcfg",
    about = "Inspect, edit and reformat libconfig-style configuration files",
    version = "0.1.0"
)]
struct Cli {
    /// Global log level: off, error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: LevelFilter,

    /// Per-phase log level, e.g. `include=debug` (repeatable)
    #[arg(long = "log-phase", value_name = "PHASE=LEVEL", global = true)]
    log_phase: Vec<String>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    /// Also append logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// JSON options file with `parse` and `format` sections
    #[arg(long, global = true, value_name = "FILE")]
    options: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Include resolution flags shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
struct IncludeArgs {
    /// Directory searched for relative `@include` paths (repeatable)
    #[arg(short = 'I', long = "include-dir", value_name = "DIR")]
    include_dirs: Vec<PathBuf>,

    /// Ignore `@include` directives whose file cannot be found
    #[arg(long)]
    skip_missing: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a file and report errors with source context
    Check {
        file: PathBuf,
        #[command(flatten)]
        include: IncludeArgs,
    },
    /// Print the value at a path (aggregates are printed in canonical form)
    Get {
        file: PathBuf,
        path: String,
        /// Print the setting type instead of the value
        #[arg(long = "type", conflicts_with = "count")]
        show_type: bool,
        /// Print the number of children instead of the value
        #[arg(long)]
        count: bool,
        #[command(flatten)]
        include: IncludeArgs,
    },
    /// Replace or create a scalar setting and write the file back
    Set {
        file: PathBuf,
        path: String,
        value: String,
        /// Value type (inferred from the value when omitted)
        #[arg(long, value_enum)]
        kind: Option<ValueKind>,
        #[command(flatten)]
        include: IncludeArgs,
    },
    /// Delete a setting and write the file back
    Remove {
        file: PathBuf,
        path: String,
        #[command(flatten)]
        include: IncludeArgs,
    },
    /// Print the file in canonical form
    Fmt {
        file: PathBuf,
        /// Rewrite the file in place instead of printing
        #[arg(long)]
        write: bool,
        /// Spaces per nesting level
        #[arg(long, value_name = "N")]
        indent: Option<usize>,
        /// Maximum width of inline arrays and lists
        #[arg(long, value_name = "N")]
        width: Option<usize>,
        #[command(flatten)]
        include: IncludeArgs,
    },
    /// Print the settings tree as JSON
    Dump {
        file: PathBuf,
        #[command(flatten)]
        include: IncludeArgs,
    },
    /// List the children of a group, list or array
    List {
        file: PathBuf,
        path: Option<String>,
        #[command(flatten)]
        include: IncludeArgs,
    },
}

/// Scalar kinds accepted by `set --kind`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ValueKind {
    String,
    Int,
    Int64,
    Float,
    Bool,
}

impl From<ValueKind> for SettingType {
    fn from(kind: ValueKind) -> Self {
        match kind {
            ValueKind::String => SettingType::String,
            ValueKind::Int => SettingType::Integer,
            ValueKind::Int64 => SettingType::Int64,
            ValueKind::Float => SettingType::Float,
            ValueKind::Bool => SettingType::Bool,
        }
    }
}

impl Command {
    fn file(&self) -> &Path {
        match self {
            Command::Check { file, .. }
            | Command::Get { file, .. }
            | Command::Set { file, .. }
            | Command::Remove { file, .. }
            | Command::Fmt { file, .. }
            | Command::Dump { file, .. }
            | Command::List { file, .. } => file,
        }
    }

    fn overrides(&self) -> LoadOverrides {
        let include = match self {
            Command::Check { include, .. }
            | Command::Get { include, .. }
            | Command::Set { include, .. }
            | Command::Remove { include, .. }
            | Command::Fmt { include, .. }
            | Command::Dump { include, .. }
            | Command::List { include, .. } => include,
        };
        let (indent, width) = match self {
            Command::Fmt { indent, width, .. } => (*indent, *width),
            _ => (None, None),
        };
        LoadOverrides {
            include_dirs: include.include_dirs.clone(),
            skip_missing: include.skip_missing,
            indent,
            width,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Logging
    let mut log_config = LogConfig::new(cli.log_level);
    for spec in &cli.log_phase {
        if let Err(e) = log_config.apply_override(spec) {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
    if let Err(e) = logging::init_with_file(&log_config, cli.log_format, cli.log_file.as_deref()) {
        eprintln!("Error: Cannot open log file: {}", e);
        process::exit(2);
    }

    // Options file, then command-line overrides
    let options = match read_options(cli.options.as_deref()) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };
    let load_config = build_load_config(options, &cli.command.overrides());

    // Initialize API config (global singleton for convenience)
    if init_config(load_config).is_err() {
        tracing::warn!(target: "lcfg::cli", "Global configuration was already initialized");
    }

    let file = cli.command.file().to_path_buf();
    match run(cli.command) {
        Ok(output) => print!("{}", output),
        Err(CliError::Config(e)) => {
            report_error(&e, &file);
            process::exit(1);
        }
        Err(CliError::Message(msg)) => {
            eprintln!("Error: {}", msg);
            process::exit(1);
        }
    }
}

fn run(command: Command) -> CliResult<String> {
    let config = get_config();
    match command {
        Command::Check { file, .. } => commands::check(&file, config),
        Command::Get {
            file,
            path,
            show_type,
            count,
            ..
        } => {
            let mode = if show_type {
                GetMode::Type
            } else if count {
                GetMode::Count
            } else {
                GetMode::Value
            };
            commands::get(&file, &path, mode, config)
        }
        Command::Set {
            file,
            path,
            value,
            kind,
            ..
        } => commands::set(&file, &path, &value, kind.map(SettingType::from), config),
        Command::Remove { file, path, .. } => commands::remove(&file, &path, config),
        Command::Fmt { file, write, .. } => commands::fmt(&file, write, config),
        Command::Dump { file, .. } => commands::dump(&file, config),
        Command::List { file, path, .. } => commands::list(&file, path.as_deref(), config),
    }
}
