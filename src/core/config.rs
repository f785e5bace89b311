//! # Configuration Module / 配置模块
//!
//! Defines `LoggingConfig`, the options recognized when opening a logging
//! target, and loads it from a TOML file (`TestLog.toml` by default).
//!
//! 定义 `LoggingConfig`（打开日志目标时识别的选项），并从 TOML 文件加载。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the configuration file / 配置文件的默认名称
pub const DEFAULT_CONFIG_FILE: &str = "TestLog.toml";

/// File name of the cross-suite failure log inside the log folder.
/// 日志目录中跨套件失败日志的文件名。
pub const FAILURE_LOG_FILE: &str = "allFailedTests.log";

/// Which destinations a router writes to. Fixed for the lifetime of a router.
/// 路由器写入的目标。在路由器的生命周期内固定不变。
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingMode {
    /// Transcript file plus the cumulative failure log.
    /// 记录文件加累计失败日志。
    #[default]
    Local,
    /// Console output tagged `[Pre-commit] `, only while a commit hook is running.
    /// 带 `[Pre-commit] ` 标签的控制台输出，仅在提交钩子运行时生效。
    #[serde(alias = "pre-commit")]
    PreCommit,
    Both,
}

impl LoggingMode {
    pub fn writes_local(&self) -> bool {
        matches!(self, LoggingMode::Local | LoggingMode::Both)
    }

    pub fn writes_precommit(&self) -> bool {
        matches!(self, LoggingMode::PreCommit | LoggingMode::Both)
    }
}

impl fmt::Display for LoggingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoggingMode::Local => "local",
            LoggingMode::PreCommit => "precommit",
            LoggingMode::Both => "both",
        };
        f.write_str(s)
    }
}

/// Layout of the rendered report.
/// 渲染报告的布局。
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStyle {
    /// Every operation with its payload, error and code context.
    #[default]
    Detailed,
    /// One line per test plus failure details derived from the stack.
    Compact,
}

/// Options for one logging target (one suite transcript).
///
/// Keys are snake_case in TOML; the camelCase names used by JavaScript
/// harness configs are accepted as aliases.
///
/// 一个日志目标（一个套件记录文件）的选项。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Language for CLI messages (e.g., "en", "zh-CN").
    /// CLI 消息的语言（例如 "en", "zh-CN"）。
    #[serde(default = "default_language")]
    pub language: String,

    /// File name of the per-suite transcript / 每个套件记录文件的文件名
    #[serde(alias = "logFileName")]
    pub log_file_name: String,

    /// Subdirectory of the log folder holding this suite's transcript.
    /// 日志目录下存放此套件记录文件的子目录。
    #[serde(alias = "testSuiteDir")]
    pub test_suite_dir: String,

    #[serde(default = "default_log_folder", alias = "logFolderName")]
    pub log_folder_name: String,

    #[serde(default)]
    pub mode: LoggingMode,

    /// Display name of the suite in reports. Defaults to the last component
    /// of `test_suite_dir`.
    #[serde(default, alias = "suiteName")]
    pub suite_name: Option<String>,

    #[serde(default, alias = "reportStyle")]
    pub report_style: ReportStyle,

    /// Lines of code shown on each side of a failing line.
    /// 失败行两侧显示的代码行数。
    #[serde(default = "default_context_lines", alias = "contextLines")]
    pub context_lines: usize,

    /// Prefix every transcript line with an RFC 3339 timestamp.
    #[serde(default, alias = "timestampLines")]
    pub timestamp_lines: bool,

    /// Truncate `allFailedTests.log` once, when the first target of a run
    /// opens it. Every suite appends afterwards.
    #[serde(default, alias = "truncateFailureLog")]
    pub truncate_failure_log: bool,

    /// Whether a commit hook is running. Never read from the file: the
    /// caller resolves it once and sets it here.
    /// 是否正在运行提交钩子。从不从文件读取：由调用方解析一次后设置。
    #[serde(skip)]
    pub hook_active: bool,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_log_folder() -> String {
    "logs".to_string()
}

fn default_context_lines() -> usize {
    2
}

impl LoggingConfig {
    /// Builds a config with default values for everything but the two required keys.
    pub fn new(log_file_name: impl Into<String>, test_suite_dir: impl Into<String>) -> Self {
        Self {
            language: default_language(),
            log_file_name: log_file_name.into(),
            test_suite_dir: test_suite_dir.into(),
            log_folder_name: default_log_folder(),
            mode: LoggingMode::default(),
            suite_name: None,
            report_style: ReportStyle::default(),
            context_lines: default_context_lines(),
            timestamp_lines: false,
            truncate_failure_log: false,
            hook_active: false,
        }
    }

    pub fn with_mode(mut self, mode: LoggingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_hook_active(mut self, hook_active: bool) -> Self {
        self.hook_active = hook_active;
        self
    }

    pub fn with_log_folder(mut self, log_folder_name: impl Into<String>) -> Self {
        self.log_folder_name = log_folder_name.into();
        self
    }

    pub fn with_report_style(mut self, style: ReportStyle) -> Self {
        self.report_style = style;
        self
    }

    /// Name shown in report headers and the failure log.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.suite_name {
            return name.clone();
        }
        Path::new(&self.test_suite_dir)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.test_suite_dir.clone())
    }

    /// `<base>/<log_folder_name>`
    pub fn log_root(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.log_folder_name)
    }

    /// `<base>/<log_folder_name>/<test_suite_dir>/<log_file_name>`
    pub fn transcript_path(&self, base_dir: &Path) -> PathBuf {
        self.log_root(base_dir)
            .join(&self.test_suite_dir)
            .join(&self.log_file_name)
    }

    /// `<base>/<log_folder_name>/allFailedTests.log`
    pub fn failure_log_path(&self, base_dir: &Path) -> PathBuf {
        self.log_root(base_dir).join(FAILURE_LOG_FILE)
    }
}

/// Reads and parses a `LoggingConfig` from a TOML file.
/// 从 TOML 文件读取并解析 `LoggingConfig`。
pub fn load_config(path: &Path) -> Result<LoggingConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parses a `LoggingConfig` from TOML text.
pub fn parse_config(content: &str) -> Result<LoggingConfig> {
    let config: LoggingConfig = toml::from_str(content)?;
    if config.log_file_name.trim().is_empty() {
        anyhow::bail!("`log_file_name` must not be empty");
    }
    Ok(config)
}
