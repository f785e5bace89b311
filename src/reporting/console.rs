//! # Console Reporting Module / 控制台报告模块
//!
//! Prints the colored end-of-run summary the CLI shows after a suite has been
//! flushed. The report itself goes through the sinks; this is only the
//! human-facing recap.
//!
//! 打印 CLI 在套件刷新后显示的彩色运行摘要。报告本身通过输出端写入；
//! 这里只是面向用户的回顾。

use colored::*;

use crate::core::models::SuiteSummary;
use crate::infra::t;

/// Prints a formatted summary of a flushed suite to the console.
///
/// 在控制台打印已刷新套件的格式化摘要。
///
/// # Arguments / 参数
/// * `summary` - Totals returned by the flush / 刷新返回的总计
/// * `locale` - The language locale to use for messages / 用于消息的语言区域设置
///
/// # Output Format / 输出格式
/// ```text
/// --- Suite Summary ---
///   cache: 1 failed, 2 passed, 3 total (41ms)
///   - FAILED  | evicts stale keys
///
/// FAILURES DETECTED
/// ```
pub fn print_summary(summary: &SuiteSummary, locale: &str) {
    println!("\n{}", t!("summary.banner", locale = locale).bold());
    println!(
        "  {}: {}",
        summary.suite.cyan(),
        t!(
            "summary.totals",
            locale = locale,
            failed = summary.failed,
            passed = summary.passed,
            total = summary.total,
            elapsed = summary.elapsed_ms
        )
    );

    for name in &summary.failed_tests {
        println!(
            "  - {:<8} | {}",
            t!("summary.failed_test", locale = locale).red(),
            name
        );
    }

    if summary.has_failures() {
        println!("\n{}", t!("summary.failures_found", locale = locale).red().bold());
    } else {
        println!("\n{}", t!("summary.all_passed", locale = locale).green().bold());
    }
}
