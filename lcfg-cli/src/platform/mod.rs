//! Platform - 平台适配层
//!
//! 终端输出相关的副作用在这里实现：
//! - 错误报告与源码上下文
//! - 设置列表的表格输出

pub mod cli;

// 重导出 CLI 功能
pub use cli::{print_error_with_source, print_source_context, report_error};
