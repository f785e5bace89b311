//! # Config Module Unit Tests / Config 模块单元测试
//!
//! This module contains unit tests for the `config.rs` module, covering
//! `LoggingConfig` parsing, defaults, the camelCase aliases and the derived
//! log paths.
//!
//! 此模块包含 `config.rs` 模块的单元测试，涵盖 `LoggingConfig` 的解析、
//! 默认值、camelCase 别名以及派生的日志路径。

use std::path::Path;
use suite_logger::core::config::{
    FAILURE_LOG_FILE, LoggingConfig, LoggingMode, ReportStyle, load_config, parse_config,
};
use tempfile::TempDir;

#[cfg(test)]
mod parsing_tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse_config(
            r#"
log_file_name = "cache.log"
test_suite_dir = "cache"
"#,
        )
        .unwrap();

        assert_eq!(config.log_file_name, "cache.log");
        assert_eq!(config.test_suite_dir, "cache");
        assert_eq!(config.log_folder_name, "logs");
        assert_eq!(config.language, "en");
        assert_eq!(config.mode, LoggingMode::Local);
        assert_eq!(config.report_style, ReportStyle::Detailed);
        assert_eq!(config.context_lines, 2);
        assert!(!config.timestamp_lines);
        assert!(!config.truncate_failure_log);
        assert!(!config.hook_active);
        assert_eq!(config, LoggingConfig::new("cache.log", "cache"));
    }

    #[test]
    fn test_full_config() {
        let config = parse_config(
            r#"
language = "zh-CN"
log_file_name = "api.log"
test_suite_dir = "integration/api"
log_folder_name = "test-logs"
mode = "both"
suite_name = "API"
report_style = "compact"
context_lines = 4
timestamp_lines = true
truncate_failure_log = true
"#,
        )
        .unwrap();

        assert_eq!(config.language, "zh-CN");
        assert_eq!(config.mode, LoggingMode::Both);
        assert_eq!(config.suite_name.as_deref(), Some("API"));
        assert_eq!(config.report_style, ReportStyle::Compact);
        assert_eq!(config.context_lines, 4);
        assert!(config.timestamp_lines);
        assert!(config.truncate_failure_log);
    }

    #[test]
    fn test_camel_case_aliases() {
        let config = parse_config(
            r#"
logFileName = "ui.log"
testSuiteDir = "ui"
logFolderName = "out"
mode = "pre-commit"
"#,
        )
        .unwrap();

        assert_eq!(config.log_file_name, "ui.log");
        assert_eq!(config.test_suite_dir, "ui");
        assert_eq!(config.log_folder_name, "out");
        assert_eq!(config.mode, LoggingMode::PreCommit);
    }

    #[test]
    fn test_hook_state_is_never_read_from_the_file() {
        let config = parse_config(
            r#"
log_file_name = "a.log"
test_suite_dir = "a"
hook_active = true
"#,
        )
        .unwrap();

        assert!(!config.hook_active);
    }

    #[test]
    fn test_missing_required_key_fails() {
        assert!(parse_config(r#"log_file_name = "a.log""#).is_err());
    }

    #[test]
    fn test_empty_log_file_name_fails() {
        let err = parse_config(
            r#"
log_file_name = "  "
test_suite_dir = "a"
"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("log_file_name"));
    }

    #[test]
    fn test_unknown_mode_fails() {
        assert!(
            parse_config(
                r#"
log_file_name = "a.log"
test_suite_dir = "a"
mode = "cloud"
"#
            )
            .is_err()
        );
    }

    #[test]
    fn test_invalid_toml_fails() {
        assert!(parse_config("this is = = not toml").is_err());
    }
}

#[cfg(test)]
mod file_tests {
    use super::*;

    #[test]
    fn test_load_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("TestLog.toml");
        std::fs::write(&path, "log_file_name = \"x.log\"\ntest_suite_dir = \"x\"\n").unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.log_file_name, "x.log");
    }

    #[test]
    fn test_load_missing_file_names_the_path() {
        let err = load_config(Path::new("/definitely/not/here/TestLog.toml")).unwrap_err();

        assert!(format!("{:#}", err).contains("TestLog.toml"));
    }
}

#[cfg(test)]
mod path_tests {
    use super::*;

    #[test]
    fn test_derived_paths() {
        let config = LoggingConfig::new("run.log", "unit/cache").with_log_folder("out");
        let base = Path::new("/work");

        assert_eq!(config.log_root(base), Path::new("/work/out"));
        assert_eq!(config.transcript_path(base), Path::new("/work/out/unit/cache/run.log"));
        assert_eq!(
            config.failure_log_path(base),
            Path::new("/work/out").join(FAILURE_LOG_FILE)
        );
    }

    #[test]
    fn test_display_name() {
        let config = LoggingConfig::new("run.log", "unit/cache");
        assert_eq!(config.display_name(), "cache");

        let named = LoggingConfig {
            suite_name: Some("Cache Suite".to_string()),
            ..config
        };
        assert_eq!(named.display_name(), "Cache Suite");
    }

    #[test]
    fn test_mode_destinations() {
        assert!(LoggingMode::Local.writes_local());
        assert!(!LoggingMode::Local.writes_precommit());
        assert!(!LoggingMode::PreCommit.writes_local());
        assert!(LoggingMode::PreCommit.writes_precommit());
        assert!(LoggingMode::Both.writes_local() && LoggingMode::Both.writes_precommit());
        assert_eq!(LoggingMode::PreCommit.to_string(), "precommit");
    }
}
