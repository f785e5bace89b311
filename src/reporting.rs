//! # Reporting Module / 报告模块
//!
//! This module renders suite reports: source-code excerpts around failing
//! lines, the detailed and compact report layouts, and the colored console
//! summary printed by the CLI.
//!
//! 此模块渲染套件报告：失败行周围的源码摘录、详细和紧凑的报告布局，
//! 以及 CLI 打印的彩色控制台摘要。

pub mod console;
pub mod context;
pub mod render;

// Re-export common reporting functions
pub use console::print_summary;
pub use context::{extract, extract_at};
