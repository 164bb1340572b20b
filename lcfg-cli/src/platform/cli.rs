//! CLI 格式化输出
//!
//! 提供命令行友好的错误显示和源码上下文打印。

use lcfg_api::{ErrorDetails, LcfgError};
use std::path::Path;

/// 打印错误；能读到出错文件时附带源码上下文
///
/// 错误可能来自被包含的文件，此时读取的是该文件而不是入口文件。
pub fn report_error(e: &LcfgError, entry: &Path) {
    let source_path = e.file().unwrap_or(entry);
    match std::fs::read_to_string(source_path) {
        Ok(source) => print_error_with_source(e, &source),
        Err(_) => print_error_with_source(e, ""),
    }
}

/// 打印错误并显示源代码上下文
pub fn print_error_with_source(e: &LcfgError, source: &str) {
    let report = e.to_report();
    eprintln!("❌ {}", report);

    match &report.details {
        Some(ErrorDetails::Candidates { tried }) if !tried.is_empty() => {
            eprintln!("   tried:");
            for candidate in tried {
                eprintln!("     - {}", candidate);
            }
        }
        Some(ErrorDetails::IncludeChain { chain }) => {
            eprintln!("   include chain: {}", chain.join(" -> "));
        }
        _ => {}
    }

    if let (Some(error_line), Some(col)) = (e.line(), e.column()) {
        print_source_context(source, error_line, col);
    }
}

/// 打印源代码上下文（显示错误行前后几行）
pub fn print_source_context(source: &str, error_line: usize, error_col: usize) {
    eprint!("{}", render_source_context(source, error_line, error_col));
}

fn render_source_context(source: &str, error_line: usize, error_col: usize) -> String {
    const CONTEXT_LINES: usize = 2; // 错误行前后显示的上下文行数

    let lines: Vec<&str> = source.lines().collect();
    let total_lines = lines.len();

    if error_line == 0 || error_line > total_lines {
        return String::new();
    }

    let start_line = error_line.saturating_sub(CONTEXT_LINES).max(1);
    let end_line = (error_line + CONTEXT_LINES).min(total_lines);
    let width = end_line.to_string().len();

    let separator = "-".repeat(width + 1);
    let mut out = format!("{}|--\n", separator);

    for line_idx in start_line..=end_line {
        let line_content = lines[line_idx - 1];
        out.push_str(&format!("{:>width$} | {}\n", line_idx, line_content, width = width));

        if line_idx == error_line {
            // 指向错误列的标记
            let marker = " ".repeat(error_col.saturating_sub(1));
            out.push_str(&format!("{} | {}^\n", " ".repeat(width), marker));
        }
    }

    out.push_str(&format!("{}|--\n", separator));
    out
}
