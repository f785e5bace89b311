//! # Suite Run Integration Tests / 套件运行集成测试
//!
//! End-to-end runs through the public API: open a target, record results,
//! flush, gate and close. Covers report isolation between consecutive
//! suites and the pre-commit console flow.
//!
//! 通过公共 API 的端到端运行：打开目标、记录结果、刷新、门控和关闭。
//! 覆盖连续套件之间的报告隔离以及预提交控制台流程。

mod common;

use common::{SharedBuffer, adds_numbers_results, read, write_math_test};
use std::io::Write;
use std::sync::Arc;
use suite_logger::core::aggregator::ResultAggregator;
use suite_logger::core::config::{FAILURE_LOG_FILE, LoggingConfig, LoggingMode};
use suite_logger::core::gate::{ABORT_MESSAGE, Verdict, pre_commit_verdict};
use suite_logger::core::lifecycle::LifecycleManager;
use suite_logger::core::models::{OperationType, TestResult};
use tempfile::TempDir;

fn manager_with_console(base: &std::path::Path, buffer: &SharedBuffer) -> LifecycleManager {
    let buffer = buffer.clone();
    LifecycleManager::new(base)
        .with_console_writer(Arc::new(move || Box::new(buffer.clone()) as Box<dyn Write + Send>))
}

fn passed(name: &str) -> TestResult {
    TestResult::passed(name, OperationType::Get).with_duration(1)
}

#[test]
fn test_consecutive_suites_do_not_leak_into_each_other() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = LifecycleManager::new(temp_dir.path());
    let mut aggregator = ResultAggregator::default();

    let first = manager.open(&LoggingConfig::new("run.log", "first")).unwrap();
    aggregator.record(passed("alpha"));
    aggregator.record(passed("beta"));
    let first_summary = aggregator.flush(&first);
    manager.close(&first);
    let first_transcript = read(first.target());

    let second = manager.open(&LoggingConfig::new("run.log", "second")).unwrap();
    aggregator.record(passed("gamma"));
    let second_summary = aggregator.flush(&second);
    manager.close(&second);
    let second_transcript = read(second.target());

    assert_eq!(first_summary.total, 2);
    assert_eq!(second_summary.total, 1);
    assert!(first_transcript.contains("Test: alpha"));
    assert!(!first_transcript.contains("gamma"));
    assert!(second_transcript.contains("Test: gamma"));
    assert!(!second_transcript.contains("alpha"));
    assert_eq!(manager.open_sink_count(), 0);
}

#[test]
fn test_two_flushes_through_one_router_report_each_suite_once() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = LifecycleManager::new(temp_dir.path());
    let handle = manager.open(&LoggingConfig::new("run.log", "shared")).unwrap();
    let mut aggregator = ResultAggregator::new(handle.report_options().clone());

    aggregator.record(passed("alpha"));
    aggregator.flush(&handle);
    let after_first = read(handle.target());
    aggregator.record(passed("beta"));
    aggregator.flush(&handle);
    manager.close(&handle);
    let after_second = read(handle.target());

    assert!(!after_first.contains("beta"));
    assert_eq!(after_second.matches("Test: alpha").count(), 1);
    assert_eq!(after_second.matches("Test: beta").count(), 1);
    assert_eq!(after_second.matches("All tests completed.").count(), 2);
}

#[test]
fn test_local_flush_writes_transcript_and_failure_log() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_math_test(temp_dir.path());
    let mut manager = LifecycleManager::new(temp_dir.path());
    let handle = manager.open(&LoggingConfig::new("math.log", "math")).unwrap();
    let mut aggregator = ResultAggregator::new(handle.report_options().clone());

    for result in adds_numbers_results(&source) {
        aggregator.record(result);
    }
    aggregator.record(passed("subtracts"));
    let summary = aggregator.flush(&handle);
    manager.close(&handle);

    assert_eq!((summary.failed, summary.passed, summary.total), (1, 1, 2));

    let transcript = read(handle.target());
    assert!(transcript.contains("Test: adds numbers"));
    assert!(transcript.contains(">    3 |     expect(add(1, 2)).toBe(4);"));
    assert!(transcript.contains("All tests completed. 1 failed, 1 passed, 2 total."));

    let failure_log = read(&temp_dir.path().join("logs").join(FAILURE_LOG_FILE));
    assert!(failure_log.starts_with("Test summary for math ("));
    assert!(failure_log.contains("Tests: 1 failed, 1 passed, 2 total\n  × adds numbers\n"));
    assert!(!failure_log.contains("subtracts"));
}

#[test]
fn test_precommit_gate_aborts_on_failure() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_math_test(temp_dir.path());
    let buffer = SharedBuffer::default();
    let mut manager = manager_with_console(temp_dir.path(), &buffer);
    let config = LoggingConfig::new("math.log", "math")
        .with_mode(LoggingMode::Both)
        .with_hook_active(true);
    let handle = manager.open(&config).unwrap();
    let mut aggregator = ResultAggregator::new(handle.report_options().clone());

    for result in adds_numbers_results(&source) {
        aggregator.record(result);
    }
    let summary = aggregator.flush(&handle);
    let verdict = pre_commit_verdict(&handle, &summary);
    manager.close(&handle);

    assert_eq!(verdict, Verdict::Abort);

    let console = buffer.contents();
    assert!(console.contains("[Pre-commit] Test: adds numbers\n"));
    assert!(console.contains("[Pre-commit] Test Results: 1 failed, 0 passed, 1 total.\n"));
    assert!(console.ends_with(&format!("[Pre-commit] {}\n", ABORT_MESSAGE)));
    // One tag per message: the report, the results line and the abort line.
    assert_eq!(console.matches("[Pre-commit] ").count(), 3);
    assert!(console.contains("\n  Status: failed\n"));

    // The local transcript receives the gate lines too, without the prefix.
    let transcript = read(handle.target());
    assert!(transcript.contains("Test Results: 1 failed, 0 passed, 1 total."));
    assert!(!transcript.contains("[Pre-commit]"));
}

#[test]
fn test_precommit_gate_proceeds_when_everything_passes() {
    let temp_dir = TempDir::new().unwrap();
    let buffer = SharedBuffer::default();
    let mut manager = manager_with_console(temp_dir.path(), &buffer);
    let config = LoggingConfig::new("ok.log", "ok")
        .with_mode(LoggingMode::PreCommit)
        .with_hook_active(true);
    let handle = manager.open(&config).unwrap();
    let mut aggregator = ResultAggregator::new(handle.report_options().clone());

    aggregator.record(passed("fine"));
    let summary = aggregator.flush(&handle);

    assert_eq!(pre_commit_verdict(&handle, &summary), Verdict::Proceed);
    let console = buffer.contents();
    assert!(console.contains("[Pre-commit] Test Results: 0 failed, 1 passed, 1 total.\n"));
    assert!(!console.contains(ABORT_MESSAGE));
}

#[test]
fn test_precommit_mode_without_hook_is_silent_and_never_aborts() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_math_test(temp_dir.path());
    let buffer = SharedBuffer::default();
    let mut manager = manager_with_console(temp_dir.path(), &buffer);
    let config = LoggingConfig::new("math.log", "math").with_mode(LoggingMode::PreCommit);
    let handle = manager.open(&config).unwrap();
    let mut aggregator = ResultAggregator::new(handle.report_options().clone());

    for result in adds_numbers_results(&source) {
        aggregator.record(result);
    }
    let summary = aggregator.flush(&handle);

    assert!(summary.has_failures());
    assert_eq!(pre_commit_verdict(&handle, &summary), Verdict::Proceed);
    assert!(buffer.contents().is_empty());
    assert!(!temp_dir.path().join("logs").exists());
}

#[test]
fn test_local_mode_failures_never_abort() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = LifecycleManager::new(temp_dir.path());
    let handle = manager
        .open(&LoggingConfig::new("run.log", "suite").with_hook_active(true))
        .unwrap();
    let mut aggregator = ResultAggregator::new(handle.report_options().clone());

    aggregator.record(TestResult::failed("broken", OperationType::Remove));
    let summary = aggregator.flush(&handle);

    assert_eq!(pre_commit_verdict(&handle, &summary), Verdict::Proceed);
    assert!(!read(handle.target()).contains(ABORT_MESSAGE));
}
