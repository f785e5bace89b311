//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for the logging engine:
//! output sinks, file system helpers and i18n support.
//!
//! 此模块为日志引擎提供基础设施服务：
//! 输出端、文件系统工具和国际化支持。

pub mod fs;
pub mod sink;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
