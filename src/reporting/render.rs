//! # Report Rendering Module / 报告渲染模块
//!
//! Turns grouped `SuiteReport`s into the text that is written to the sinks.
//! Two layouts exist: the detailed transcript (every operation, payload,
//! error and code context) and a compact summary in the style of common
//! JavaScript test runners. Both end with the suite totals.
//!
//! 将分组后的 `SuiteReport` 转换为写入输出端的文本。
//! 支持两种布局：详细记录（每个操作、负载、错误和代码上下文）
//! 以及类似常见 JavaScript 测试运行器风格的紧凑摘要。两者都以套件总计结尾。

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::core::config::{LoggingConfig, ReportStyle};
use crate::core::models::{SuiteReport, SuiteSummary, TestResult};
use crate::core::stack::{self, StackLocation};
use crate::reporting::context::{self, DEFAULT_CONTEXT_LINES};

/// Shown in compact failure details when the stack has no usable location.
pub const NO_CONTEXT: &str = "No code context available";

/// Rendering settings, usually derived from a `LoggingConfig`.
/// 渲染设置，通常由 `LoggingConfig` 派生。
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub style: ReportStyle,
    pub suite_name: String,
    pub context_lines: usize,
    /// Directory relative source paths are resolved against.
    /// 解析相对源码路径时使用的目录。
    pub source_root: PathBuf,
}

impl ReportOptions {
    pub fn from_config(config: &LoggingConfig, source_root: &Path) -> Self {
        Self {
            style: config.report_style,
            suite_name: config.display_name(),
            context_lines: config.context_lines,
            source_root: source_root.to_path_buf(),
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            style: ReportStyle::Detailed,
            suite_name: "suite".to_string(),
            context_lines: DEFAULT_CONTEXT_LINES,
            source_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

/// Renders the full report in the configured style.
pub fn render_report(reports: &[SuiteReport], summary: &SuiteSummary, options: &ReportOptions) -> String {
    match options.style {
        ReportStyle::Detailed => render_detailed(reports, summary, options),
        ReportStyle::Compact => render_compact(reports, summary, options),
    }
}

/// The detailed transcript: one block per test, then the suite totals.
pub fn render_detailed(reports: &[SuiteReport], summary: &SuiteSummary, options: &ReportOptions) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&render_group(report, options));
        out.push('\n');
    }
    out.push_str(&summary_line(summary));
    out.push('\n');
    let _ = write!(out, "Total Time: {}ms", summary.elapsed_ms);
    out
}

/// Renders one test's block.
///
/// ```text
/// Test: adds numbers
///   Operation Type: get
///   Status: passed
///   ...
/// Overall Status: failed
/// Total Duration: 24ms
/// ```
pub fn render_group(report: &SuiteReport, options: &ReportOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Test: {}", report.test_name);
    for entry in &report.entries {
        render_entry(&mut out, entry, options);
    }
    let _ = writeln!(out, "Overall Status: {}", report.overall_status);
    let _ = writeln!(out, "Total Duration: {}ms", report.total_duration_ms);
    out
}

fn render_entry(out: &mut String, entry: &TestResult, options: &ReportOptions) {
    let _ = writeln!(out, "  Operation Type: {}", entry.operation_type);
    let _ = writeln!(out, "  Status: {}", entry.status);
    let _ = writeln!(out, "  Duration: {}ms", entry.duration_ms);
    let _ = writeln!(out, "  File: {}", entry.source_file.display());
    let _ = writeln!(out, "  Line Number: {}", entry.source_line);

    if entry.is_failure() {
        if let Some(error) = &entry.error {
            if let Some(message) = error.message() {
                let _ = writeln!(out, "  Error: {}", message);
            }
            if let Some(stack) = error.stack.as_deref().filter(|s| !s.trim().is_empty()) {
                out.push_str("  Stack:\n");
                for line in stack.lines() {
                    let _ = writeln!(out, "    {}", line.trim_end());
                }
            }
        }
        out.push_str("  Code Context:\n");
        out.push_str(&entry_context(entry, options));
        out.push('\n');
    }

    out.push_str("  Operation Results:\n");
    let payload = serde_json::to_string_pretty(&entry.operation_payload)
        .unwrap_or_else(|_| entry.operation_payload.to_string());
    for line in payload.lines() {
        let _ = writeln!(out, "    {}", line);
    }
}

/// Excerpt around the entry's own line. The stack contributes the caret
/// column when one of its frames points at that same line of the file.
fn entry_context(entry: &TestResult, options: &ReportOptions) -> String {
    let column = stack_location(entry).filter(|loc| loc.line == entry.source_line);
    match column {
        Some(location) => context::extract_at_in(
            &options.source_root,
            &entry.source_file,
            location,
            options.context_lines,
        ),
        None => context::extract_in(
            &options.source_root,
            &entry.source_file,
            entry.source_line,
            options.context_lines,
        ),
    }
}

fn stack_location(entry: &TestResult) -> Option<StackLocation> {
    let stack = entry.error.as_ref()?.stack.as_deref()?;
    let hint = file_hint(&entry.source_file);
    stack::parse_location(stack, hint.as_deref())
}

fn file_hint(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// The compact layout:
///
/// ```text
/// FAIL tests/math.rs (0.024 s)
///   math
///     √ adds numbers (12 ms)
///     × divides (12 ms)
///
///   ● math › divides
///     expected 2, got 3
/// ...
/// Tests:       1 failed, 1 passed, 2 total
/// ```
pub fn render_compact(reports: &[SuiteReport], summary: &SuiteSummary, options: &ReportOptions) -> String {
    let mut out = String::new();
    let status = if summary.has_failures() { "FAIL" } else { "PASS" };
    let suite_file = reports
        .first()
        .and_then(|r| r.entries.first())
        .map(|e| e.source_file.display().to_string())
        .unwrap_or_else(|| options.suite_name.clone());
    let seconds = summary.elapsed_ms as f64 / 1000.0;

    let _ = writeln!(out, "{} {} ({:.3} s)", status, suite_file, seconds);
    let _ = writeln!(out, "  {}", options.suite_name);
    for report in reports {
        let mark = if report.overall_status.is_failure() { '×' } else { '√' };
        let _ = writeln!(
            out,
            "    {} {} ({} ms)",
            mark, report.test_name, report.total_duration_ms
        );
    }

    for report in reports.iter().filter(|r| r.overall_status.is_failure()) {
        out.push('\n');
        out.push_str(&render_compact_failure(report, options));
    }

    out.push('\n');
    let suites = if summary.has_failures() { "1 failed, 1 total" } else { "1 total" };
    let _ = writeln!(out, "Test Suites: {}", suites);
    let _ = writeln!(
        out,
        "Tests:       {} failed, {} passed, {} total",
        summary.failed, summary.passed, summary.total
    );
    out.push_str("Snapshots:   0 total\n");
    let _ = write!(out, "Time:        {:.3} s", seconds);
    out
}

fn render_compact_failure(report: &SuiteReport, options: &ReportOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  ● {} › {}", options.suite_name, report.test_name);

    let Some((entry, error)) = report.first_error() else {
        out.push_str("    (no error details)\n");
        return out;
    };
    if let Some(message) = error.message() {
        let _ = writeln!(out, "    {}", message);
    }

    let hint = file_hint(&entry.source_file);
    let stack = error.stack.as_deref().unwrap_or_default();
    let context = match stack::parse_location(stack, hint.as_deref()) {
        Some(location) => context::extract_at_in(
            &options.source_root,
            &entry.source_file,
            location,
            options.context_lines,
        ),
        None => NO_CONTEXT.to_string(),
    };
    out.push_str(&context);
    out.push('\n');

    for frame in stack::frames_matching(stack, hint.as_deref()) {
        let _ = writeln!(out, "{}", frame);
    }
    out
}

/// `All tests completed. F failed, P passed, T total.`
pub fn summary_line(summary: &SuiteSummary) -> String {
    format!(
        "All tests completed. {} failed, {} passed, {} total.",
        summary.failed, summary.passed, summary.total
    )
}

/// The entry appended to `allFailedTests.log` after each flush.
///
/// ```text
/// Test summary for math (2024-05-01T10:00:00Z):
/// Tests: 1 failed, 2 passed, 3 total
///   × divides
/// ```
pub fn failure_log_entry(summary: &SuiteSummary, at: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Test summary for {} ({}):",
        summary.suite,
        at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = write!(
        out,
        "Tests: {} failed, {} passed, {} total",
        summary.failed, summary.passed, summary.total
    );
    for name in &summary.failed_tests {
        let _ = write!(out, "\n  × {}", name);
    }
    out
}
