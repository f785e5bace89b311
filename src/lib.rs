//! # Suite Logger Library / Suite Logger 库
//!
//! This library provides the diagnostics and logging engine behind the
//! `suite-logger` tool. It collects per-test results handed over by a test
//! harness, groups and renders them into a report with source-code context
//! around every failure, and routes the report to a suite transcript, a
//! cumulative failure log and/or a pre-commit console stream.
//!
//! 此库为 `suite-logger` 工具提供诊断和日志引擎。它收集测试框架提供的
//! 每个测试结果，将其分组并渲染为报告（每个失败处附带源码上下文），
//! 并将报告路由到套件记录文件、累计失败日志和/或预提交控制台流。
//!
//! ## Modules / 模块
//!
//! - `core` - Data models, configuration, aggregation, routing and lifecycle
//! - `infra` - Output sinks and file system helpers
//! - `reporting` - Code context extraction and report rendering
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 数据模型、配置、聚合、路由和生命周期
//! - `infra` - 输出端和文件系统工具
//! - `reporting` - 代码上下文提取和报告渲染
//! - `cli` - 命令行接口和命令
//!
//! ## Example / 示例
//!
//! ```no_run
//! use suite_logger::core::{LifecycleManager, LoggingConfig, ResultAggregator, TestResult};
//! use suite_logger::core::models::{OperationType, TestError};
//!
//! let mut manager = LifecycleManager::new(".");
//! let handle = manager.open(&LoggingConfig::new("cache.log", "cache"))?;
//!
//! let mut aggregator = ResultAggregator::default();
//! aggregator.record(
//!     TestResult::failed("evicts stale keys", OperationType::Remove)
//!         .with_duration(12)
//!         .with_error(TestError::new("expected key to be gone"))
//!         .at("tests/cache.rs", 42),
//! );
//! let summary = aggregator.flush(&handle);
//! manager.close(&handle);
//! assert_eq!(summary.failed, 1);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::models;

/// Initializes the library's internationalization (i18n) based on the system locale.
///
/// It attempts to match the full locale (e.g., "zh-CN"), then just the
/// language code (e.g., "en"), and finally falls back to "en".
pub fn init() {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    rust_i18n::set_locale(resolve_locale(&locale));
}

/// Maps a requested locale onto one of the bundled translations.
/// 将请求的语言区域映射到内置的翻译之一。
pub fn resolve_locale(locale: &str) -> &str {
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&locale) {
        return locale;
    }
    locale
        .split('-')
        .next()
        .and_then(|lang_code| available_locales.iter().find(|l| **l == lang_code).copied())
        .or_else(|| {
            // "zh" alone maps onto the Simplified Chinese bundle.
            let lang_code = locale.split('-').next()?;
            available_locales
                .iter()
                .find(|l| l.starts_with(lang_code) && l.contains('-'))
                .copied()
        })
        .unwrap_or("en")
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
