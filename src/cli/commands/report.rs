//! # Report Command Module / 报告命令模块
//!
//! This module implements the `report` command: it opens the logging target
//! described by the config, records every JSON Lines test result from the
//! input, flushes the suite report through the sinks and closes everything.
//! In a commit-hook run, a failing suite turns into exit status 1.
//!
//! 此模块实现 `report` 命令：打开配置描述的日志目标，记录输入中的每条
//! JSON Lines 测试结果，通过输出端刷新套件报告并关闭所有资源。
//! 在提交钩子运行中，失败的套件会导致退出状态码 1。

use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        aggregator::ResultAggregator,
        config::{self, LoggingConfig, LoggingMode},
        gate::{self, Verdict},
        lifecycle::LifecycleManager,
        models::TestResult,
        panic_guard::PanicGuard,
    },
    infra::t,
    reporting::console::print_summary,
};

/// Arguments of the `report` command, with the environment already resolved.
/// `report` 命令的参数，环境已解析完毕。
#[derive(Debug, Clone)]
pub struct ReportArgs {
    pub config: PathBuf,
    pub input: Option<PathBuf>,
    pub base_dir: PathBuf,
    pub mode: Option<LoggingMode>,
    pub suite_dir: Option<String>,
    pub fresh: bool,
    pub hook_active: bool,
}

/// Executes the report command.
///
/// # Arguments
/// * `args` - Parsed command arguments
/// * `language` - Language given with `--lang`; the config's `language` applies otherwise
///
/// # Returns
/// `ExitCode::from(1)` when the pre-commit gate aborts, success otherwise.
pub async fn execute(args: ReportArgs, language: Option<&str>) -> Result<ExitCode> {
    let config = prepare_config(&args)?;
    let locale = crate::resolve_locale(language.unwrap_or(&config.language)).to_string();
    rust_i18n::set_locale(&locale);

    let base_dir = std::fs::canonicalize(&args.base_dir).with_context(|| {
        t!("report.base_dir_not_found", locale = &locale, path = args.base_dir.display()).to_string()
    })?;

    println!(
        "{}",
        t!("report.loading_config", locale = &locale, path = args.config.display())
    );

    let mut manager = LifecycleManager::new(base_dir);
    let handle = manager.open(&config)?;

    if config.mode.writes_local() {
        println!(
            "{}",
            t!("report.writing_transcript", locale = &locale, path = handle.target().display())
        );
    }
    if config.mode.writes_precommit() {
        if handle.precommit_active() {
            println!("{}", t!("report.precommit_detected", locale = &locale).cyan());
        } else {
            println!("{}", t!("report.precommit_inactive", locale = &locale).dimmed());
        }
    }

    let guard = PanicGuard::install(handle.clone());
    let stop_token = setup_signal_handler();

    let mut aggregator = ResultAggregator::new(handle.report_options().clone());
    let ingested = ingest(args.input.as_deref(), &mut aggregator, stop_token, &locale).await;

    // Whatever was recorded gets flushed, even if reading stopped early.
    let summary = aggregator.flush(&handle);
    let verdict = gate::pre_commit_verdict(&handle, &summary);

    drop(guard);
    manager.close(&handle);
    ingested?;

    print_summary(&summary, &locale);

    match verdict {
        Verdict::Abort => {
            eprintln!("{}", t!("report.commit_aborted", locale = &locale).red().bold());
            Ok(ExitCode::from(1))
        }
        Verdict::Proceed => Ok(ExitCode::SUCCESS),
    }
}

/// Loads the config file and applies command-line overrides.
fn prepare_config(args: &ReportArgs) -> Result<LoggingConfig> {
    let mut config = config::load_config(&args.config).with_context(|| {
        t!("report.config_read_failed", path = args.config.display()).to_string()
    })?;

    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(suite_dir) = &args.suite_dir {
        config.test_suite_dir = suite_dir.clone();
    }
    if args.fresh {
        config.truncate_failure_log = true;
    }

    config.log_folder_name = shellexpand::full(&config.log_folder_name)
        .with_context(|| format!("Failed to expand log folder: {}", config.log_folder_name))?
        .into_owned();
    config.hook_active = args.hook_active;
    Ok(config)
}

/// Reads JSON Lines results into the aggregator until the input ends or the
/// token is cancelled. Malformed lines are reported and skipped.
async fn ingest(
    input: Option<&Path>,
    aggregator: &mut ResultAggregator,
    stop_token: CancellationToken,
    locale: &str,
) -> Result<()> {
    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match input {
        Some(path) if path != Path::new("-") => {
            println!(
                "{}",
                t!("report.reading_input", locale = locale, path = path.display())
            );
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open input: {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        _ => {
            println!("{}", t!("report.reading_input", locale = locale, path = "<stdin>"));
            Box::new(BufReader::new(tokio::io::stdin()))
        }
    };

    let mut lines = LinesStream::new(reader.lines());
    let mut line_number = 0usize;

    loop {
        tokio::select! {
            biased;
            _ = stop_token.cancelled() => {
                println!("\n{}", t!("report.shutdown_signal", locale = locale).yellow());
                break;
            }
            next = lines.next() => {
                let Some(line) = next else { break };
                let line = line.context("Failed to read test results")?;
                line_number += 1;
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<TestResult>(&line) {
                    Ok(result) => aggregator.record(result),
                    Err(e) => eprintln!(
                        "{}",
                        t!("report.skipped_line", locale = locale, line = line_number, error = e).yellow()
                    ),
                }
            }
        }
    }

    println!(
        "{}",
        t!("report.recorded", locale = locale, count = aggregator.len())
    );
    Ok(())
}

/// Sets up a signal handler for graceful shutdown.
fn setup_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            token_clone.cancel();
        }
    });

    token
}
