//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures that flow through the logging engine:
//! the per-operation `TestResult` handed over by a test harness, the transient
//! per-test `SuiteReport` built while flushing, and the `SuiteSummary` returned
//! to callers once a report has been delivered.
//!
//! 此模块定义了日志引擎中流转的数据结构：
//! 由测试框架提供的单次操作 `TestResult`、刷新时临时构建的单个测试 `SuiteReport`，
//! 以及报告投递后返回给调用方的 `SuiteSummary`。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// The kind of operation a single `TestResult` observed.
/// 单个 `TestResult` 所观测到的操作类型。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Get,
    Update,
    Remove,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Get => "get",
            OperationType::Update => "update",
            OperationType::Remove => "remove",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pass/fail outcome as decided by the harness.
/// 由测试框架决定的通过/失败结果。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TestStatus::Failed)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error details attached to a failed operation. Both fields are optional in
/// practice: harnesses frequently omit the stack, and a serialized JS `Error`
/// arrives as `{}`. An empty message means none was given.
/// 附加在失败操作上的错误详情。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestError {
    /// The assertion or error message / 断言或错误消息
    #[serde(default)]
    pub message: String,
    /// The raw stack trace or backtrace, if captured / 原始堆栈跟踪（如果已捕获）
    #[serde(default)]
    pub stack: Option<String>,
}

impl TestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    /// The message, unless the harness left it out.
    pub fn message(&self) -> Option<&str> {
        Some(self.message.as_str()).filter(|m| !m.trim().is_empty())
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// One observed operation of one test, produced exactly once by the harness.
///
/// The JSON form uses the harness's camelCase field names; the older names
/// (`duration`, `operationResults`, `testLineNumber`, `filePath`) are accepted
/// as aliases so transcripts from older harness versions can still be ingested.
///
/// 测试的一次被观测操作，由测试框架恰好生成一次。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// Grouping key for the report / 报告的分组键
    pub test_name: String,
    pub operation_type: OperationType,
    pub status: TestStatus,
    /// Whole milliseconds. Fractional timer readings are rounded on ingest.
    #[serde(alias = "duration", deserialize_with = "deserialize_duration_ms")]
    pub duration_ms: u64,
    #[serde(default)]
    pub error: Option<TestError>,
    /// Arbitrary structured value describing what the operation returned.
    /// 描述操作返回内容的任意结构化值。
    #[serde(default, alias = "operationResults")]
    pub operation_payload: Value,
    #[serde(alias = "testLineNumber")]
    pub source_line: u32,
    #[serde(alias = "filePath")]
    pub source_file: PathBuf,
}

/// Harness timers report fractional milliseconds, so either JSON number form
/// is accepted.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Whole(u64),
    Fractional(f64),
}

/// Rounds to the nearest millisecond; negative or non-finite readings count as 0.
fn deserialize_duration_ms<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawDuration::deserialize(deserializer)? {
        RawDuration::Whole(ms) => ms,
        // `as` saturates at u64::MAX for readings beyond the range.
        RawDuration::Fractional(ms) if ms.is_finite() && ms > 0.0 => ms.round() as u64,
        RawDuration::Fractional(_) => 0,
    })
}

impl TestResult {
    fn new(test_name: impl Into<String>, operation_type: OperationType, status: TestStatus) -> Self {
        Self {
            test_name: test_name.into(),
            operation_type,
            status,
            duration_ms: 0,
            error: None,
            operation_payload: Value::Null,
            source_line: 1,
            source_file: PathBuf::new(),
        }
    }

    /// Starts a passed result; chain the `with_*`/`at` builders to fill it in.
    pub fn passed(test_name: impl Into<String>, operation_type: OperationType) -> Self {
        Self::new(test_name, operation_type, TestStatus::Passed)
    }

    /// Starts a failed result; `error` may stay empty.
    pub fn failed(test_name: impl Into<String>, operation_type: OperationType) -> Self {
        Self::new(test_name, operation_type, TestStatus::Failed)
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_error(mut self, error: TestError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.operation_payload = payload;
        self
    }

    /// Sets the source position. Line numbers are 1-based; `0` is clamped to `1`.
    /// 设置源码位置。行号从 1 开始；`0` 会被修正为 `1`。
    pub fn at(mut self, source_file: impl AsRef<Path>, source_line: u32) -> Self {
        self.source_file = source_file.as_ref().to_path_buf();
        self.source_line = source_line.max(1);
        self
    }

    pub fn is_failure(&self) -> bool {
        self.status.is_failure()
    }
}

/// All results of one test, in execution order. Only built during a flush.
/// 单个测试的所有结果，按执行顺序排列。仅在刷新期间构建。
#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub test_name: String,
    pub entries: Vec<TestResult>,
    pub total_duration_ms: u64,
    pub overall_status: TestStatus,
}

impl SuiteReport {
    pub fn new(test_name: String, entries: Vec<TestResult>) -> Self {
        let total_duration_ms = entries
            .iter()
            .map(|e| e.duration_ms)
            .fold(0, u64::saturating_add);
        let overall_status = if entries.iter().any(TestResult::is_failure) {
            TestStatus::Failed
        } else {
            TestStatus::Passed
        };
        Self {
            test_name,
            entries,
            total_duration_ms,
            overall_status,
        }
    }

    /// The first failed entry that carries error details, if any.
    pub fn first_error(&self) -> Option<(&TestResult, &TestError)> {
        self.entries
            .iter()
            .filter(|e| e.is_failure())
            .find_map(|e| e.error.as_ref().map(|err| (e, err)))
    }
}

/// Per-suite totals returned by every flush. Counts are of tests, not operations.
/// 每次刷新返回的套件汇总。计数以测试为单位，而非操作。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteSummary {
    pub suite: String,
    pub failed: usize,
    pub passed: usize,
    pub total: usize,
    pub elapsed_ms: u64,
    /// Names of the failed tests, in report order / 失败测试的名称，按报告顺序
    pub failed_tests: Vec<String>,
}

impl SuiteSummary {
    pub fn from_reports(suite: &str, reports: &[SuiteReport]) -> Self {
        let failed_tests: Vec<String> = reports
            .iter()
            .filter(|r| r.overall_status.is_failure())
            .map(|r| r.test_name.clone())
            .collect();
        Self {
            suite: suite.to_string(),
            failed: failed_tests.len(),
            passed: reports.len() - failed_tests.len(),
            total: reports.len(),
            elapsed_ms: reports
                .iter()
                .map(|r| r.total_duration_ms)
                .fold(0, u64::saturating_add),
            failed_tests,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
