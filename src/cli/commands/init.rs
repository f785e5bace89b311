//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command, which creates a `TestLog.toml`
//! configuration file, either from defaults or through a short interactive
//! wizard.
//!
//! 此模块实现 `init` 命令，用于创建 `TestLog.toml` 配置文件，
//! 可以使用默认值，也可以通过简短的交互式向导创建。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::core::config::{LoggingConfig, LoggingMode};
use crate::infra::fs::ensure_parent_dir;
use crate::infra::t;

/// Renders a commented configuration file for `config`.
///
/// 为 `config` 渲染带注释的配置文件。
pub fn render_config(config: &LoggingConfig) -> String {
    format!(
        r#"# Suite Logger Configuration / 测试日志配置

# Language for CLI messages / CLI 消息的语言
language = "{language}"

# Transcript: <log_folder_name>/<test_suite_dir>/<log_file_name>
# 记录文件路径
log_folder_name = "{folder}"
test_suite_dir = "{suite_dir}"
log_file_name = "{log_file}"

# Where reports go: "local", "precommit" or "both"
# 报告输出位置
mode = "{mode}"

# "detailed" transcript or "compact" summary / 详细记录或紧凑摘要
report_style = "detailed"

# Lines of code shown around a failing line / 失败行周围显示的代码行数
context_lines = 2

# Prefix transcript lines with a timestamp / 为记录行添加时间戳前缀
timestamp_lines = false

# Truncate allFailedTests.log at the start of each run / 每次运行开始时清空失败日志
truncate_failure_log = false
"#,
        language = config.language,
        folder = config.log_folder_name,
        suite_dir = config.test_suite_dir,
        log_file = config.log_file_name,
        mode = config.mode,
    )
}

/// The configuration written by `init --non-interactive`.
pub fn default_config() -> LoggingConfig {
    LoggingConfig::new("test.log", "default")
}

/// Runs the init command.
///
/// # Arguments
/// * `output` - Path of the configuration file to create
/// * `language` - Locale for prompts and messages
/// * `non_interactive` - Write the defaults without prompting
/// * `force` - Overwrite an existing file without asking
pub fn run_init_wizard(output: &Path, language: &str, non_interactive: bool, force: bool) -> Result<()> {
    let theme = ColorfulTheme::default();

    if output.exists() && !force {
        if non_interactive {
            println!(
                "{}",
                t!("init.file_exists", locale = language, path = output.display()).red()
            );
            println!("{}", t!("init.use_force", locale = language).yellow());
            return Ok(());
        }
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!("init.overwrite_prompt", locale = language, path = output.display()))
            .default(false)
            .interact()
            .context(t!("init.prompt_failed", locale = language).to_string())?;
        if !confirmation {
            println!("{}", t!("init.aborted", locale = language));
            return Ok(());
        }
    }

    let mut config = default_config();
    config.language = language.to_string();

    if !non_interactive {
        println!("\n{}", t!("init.welcome", locale = language).cyan().bold());
        println!("{}", t!("init.description", locale = language));
        prompt_for_config(&mut config, &theme, language)?;
    }

    write_config(output, &render_config(&config), language)?;

    println!(
        "{}",
        t!("init.success", locale = language, path = output.display()).green()
    );
    println!("{}", t!("init.next_steps", locale = language));
    Ok(())
}

fn prompt_for_config(config: &mut LoggingConfig, theme: &ColorfulTheme, language: &str) -> Result<()> {
    let modes = [
        (LoggingMode::Local, t!("init.mode_local", locale = language)),
        (LoggingMode::PreCommit, t!("init.mode_precommit", locale = language)),
        (LoggingMode::Both, t!("init.mode_both", locale = language)),
    ];
    let selection = Select::with_theme(theme)
        .with_prompt(t!("init.mode_prompt", locale = language))
        .items(&modes.iter().map(|m| m.1.clone()).collect::<Vec<_>>())
        .default(0)
        .interact()
        .context(t!("init.prompt_failed", locale = language).to_string())?;
    config.mode = modes[selection].0;

    config.log_folder_name = Input::with_theme(theme)
        .with_prompt(t!("init.folder_prompt", locale = language))
        .default(config.log_folder_name.clone())
        .interact_text()?;
    config.test_suite_dir = Input::with_theme(theme)
        .with_prompt(t!("init.suite_dir_prompt", locale = language))
        .default(config.test_suite_dir.clone())
        .interact_text()?;
    config.log_file_name = Input::with_theme(theme)
        .with_prompt(t!("init.log_file_prompt", locale = language))
        .default(config.log_file_name.clone())
        .interact_text()?;
    Ok(())
}

/// Writes the file through a temporary sibling so a failed write never
/// leaves a half-written config behind.
fn write_config(output: &Path, content: &str, language: &str) -> Result<()> {
    let failed = || t!("init.write_failed", locale = language, path = output.display()).to_string();

    ensure_parent_dir(output).with_context(failed)?;
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().with_context(failed)?,
    };

    let mut file = NamedTempFile::new_in(&dir).with_context(failed)?;
    file.write_all(content.as_bytes()).with_context(failed)?;
    file.persist(output).map_err(|e| e.error).with_context(failed)?;
    Ok(())
}
