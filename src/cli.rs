//! # Command-Line Interface / 命令行接口
//!
//! The CLI is the boundary layer of the tool. It is the only place that reads
//! the process environment: the language, the commit-hook marker and path
//! expansion are resolved here and handed to the core as plain values.
//!
//! CLI 是工具的边界层，也是唯一读取进程环境的地方：语言、提交钩子标记和路径展开
//! 都在这里解析，并作为普通值传递给核心模块。

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::core::config::{DEFAULT_CONFIG_FILE, LoggingMode};
use crate::infra::t;
use crate::reporting::context::DEFAULT_CONTEXT_LINES;

pub mod commands {
    pub mod context;
    pub mod init;
    pub mod report;
}

/// Environment variable whose presence marks a commit-hook run.
/// 其存在表示处于提交钩子运行中的环境变量。
pub const HOOK_ENV_VAR: &str = "HUSKY_GIT_PARAMS";

/// Whether the process runs inside a commit hook.
pub fn hook_detected() -> bool {
    env::var_os(HOOK_ENV_VAR).is_some()
}

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    let pos = args.iter().position(|arg| arg == "--lang")?;
    args.get(pos + 1).cloned()
}

fn parse_mode(value: &str) -> Result<LoggingMode, String> {
    match value.to_ascii_lowercase().as_str() {
        "local" => Ok(LoggingMode::Local),
        "precommit" | "pre-commit" => Ok(LoggingMode::PreCommit),
        "both" => Ok(LoggingMode::Both),
        other => Err(format!("unknown mode '{}' (expected local, precommit or both)", other)),
    }
}

fn build_cli(locale: &str) -> Command {
    Command::new("suite-logger")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("report")
                .about(t!("cmd_report_about", locale = locale).to_string())
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("arg_config", locale = locale).to_string())
                        .value_name("CONFIG")
                        .default_value(DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .help(t!("arg_input", locale = locale).to_string())
                        .value_name("INPUT")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("base-dir")
                        .long("base-dir")
                        .help(t!("arg_base_dir", locale = locale).to_string())
                        .value_name("BASE_DIR")
                        .default_value(".")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("mode")
                        .short('m')
                        .long("mode")
                        .help(t!("arg_mode", locale = locale).to_string())
                        .value_name("MODE")
                        .value_parser(parse_mode)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("suite-dir")
                        .long("suite-dir")
                        .help(t!("arg_suite_dir", locale = locale).to_string())
                        .value_name("SUITE_DIR")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("fresh")
                        .long("fresh")
                        .help(t!("arg_fresh", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about", locale = locale).to_string())
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("arg_non_interactive", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("force")
                        .short('f')
                        .long("force")
                        .help(t!("arg_force", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("OUTPUT")
                        .default_value(DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("context")
                .about(t!("cmd_context_about", locale = locale).to_string())
                .arg(
                    Arg::new("file")
                        .help(t!("arg_file", locale = locale).to_string())
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("line")
                        .help(t!("arg_line", locale = locale).to_string())
                        .required(true)
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    Arg::new("context-lines")
                        .short('n')
                        .long("context-lines")
                        .help(t!("arg_context_lines", locale = locale).to_string())
                        .value_name("N")
                        .default_value("2")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("column")
                        .long("column")
                        .help(t!("arg_column", locale = locale).to_string())
                        .value_name("COLUMN")
                        .value_parser(clap::value_parser!(u32))
                        .action(ArgAction::Set),
                ),
        )
}

fn report_args(matches: &ArgMatches) -> commands::report::ReportArgs {
    commands::report::ReportArgs {
        // Has default
        config: matches.get_one::<PathBuf>("config").cloned().unwrap_or_default(),
        input: matches.get_one::<PathBuf>("input").cloned(),
        base_dir: matches
            .get_one::<PathBuf>("base-dir")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(".")),
        mode: matches.get_one::<LoggingMode>("mode").copied(),
        suite_dir: matches.get_one::<String>("suite-dir").cloned(),
        fresh: matches.get_flag("fresh"),
        hook_active: hook_detected(),
    }
}

/// Parses the command line and runs the selected command.
pub async fn run() -> Result<ExitCode> {
    // Pre-parse language and initialize i18n first.
    let explicit_language = pre_parse_language();
    let language = explicit_language
        .clone()
        .unwrap_or_else(|| sys_locale::get_locale().unwrap_or_else(|| "en".to_string()));
    let language = crate::resolve_locale(&language).to_string();
    rust_i18n::set_locale(&language);

    let matches = build_cli(&language).get_matches();

    match matches.subcommand() {
        Some(("report", report_matches)) => {
            let args = report_args(report_matches);
            commands::report::execute(args, explicit_language.as_deref()).await
        }
        Some(("init", init_matches)) => {
            let non_interactive = init_matches.get_flag("non-interactive");
            let force = init_matches.get_flag("force");
            let output = init_matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

            // Show language detection message if it was auto-detected
            if explicit_language.is_none() && !non_interactive {
                println!(
                    "🌐 {}",
                    t!("system_language_detected", locale = &language, lang = &language)
                );
            }
            commands::init::run_init_wizard(&output, &language, non_interactive, force)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(("context", context_matches)) => {
            let file = context_matches
                .get_one::<PathBuf>("file")
                .cloned()
                .unwrap_or_default();
            let line = context_matches.get_one::<u32>("line").copied().unwrap_or(1);
            let context_lines = context_matches
                .get_one::<usize>("context-lines")
                .copied()
                .unwrap_or(DEFAULT_CONTEXT_LINES);
            let column = context_matches.get_one::<u32>("column").copied();
            commands::context::execute(&file, line, context_lines, column);
            Ok(ExitCode::SUCCESS)
        }
        // `subcommand_required` makes clap print help and exit before we get here.
        _ => Ok(ExitCode::SUCCESS),
    }
}
