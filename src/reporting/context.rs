//! # Code Context Module / 代码上下文模块
//!
//! Renders a fixed window of a source file around a failing line, with
//! right-aligned line numbers, a `>` marker on the failing line and an
//! optional caret under the faulting column.
//!
//! 在失败行周围渲染源文件的固定窗口，包含右对齐的行号、
//! 失败行上的 `>` 标记以及故障列下方可选的插入符。
//!
//! ## Output Format / 输出格式
//! ```text
//!     10 | fn adds() {
//!     11 |     let sum = add(2, 2);
//! >   12 |     assert_eq!(sum, 5);
//!              ^
//!     13 | }
//! ```
//!
//! Failures never escape this module: a missing file, a line number out of
//! range and read errors all come back as a descriptive string.

use crate::core::stack::StackLocation;
use crate::infra::fs::resolve_against;
use std::fs;
use std::path::Path;

/// Lines shown on each side of the failing line by default.
/// 默认在失败行两侧显示的行数。
pub const DEFAULT_CONTEXT_LINES: usize = 2;

/// Width of the right-aligned line-number column.
const LINE_NUMBER_WIDTH: usize = 6;

/// Width of everything before the source text: the number column and `" | "`.
const GUTTER_WIDTH: usize = LINE_NUMBER_WIDTH + 3;

/// Extracts the context around `line_number` of `file_path`, resolving
/// relative paths against the current working directory.
///
/// 提取 `file_path` 中 `line_number` 周围的上下文，相对路径基于当前工作目录解析。
pub fn extract(file_path: &Path, line_number: u32, context_lines: usize) -> String {
    match std::env::current_dir() {
        Ok(cwd) => extract_in(&cwd, file_path, line_number, context_lines),
        Err(e) => format!("Error reading file: {}", e),
    }
}

/// Like [`extract`], resolving relative paths against `base_dir`.
pub fn extract_in(base_dir: &Path, file_path: &Path, line_number: u32, context_lines: usize) -> String {
    render(base_dir, file_path, line_number, None, context_lines)
}

/// Like [`extract`], anchored at a parsed stack location. When the column is
/// known a caret line is inserted right after the marked line.
pub fn extract_at(file_path: &Path, location: StackLocation, context_lines: usize) -> String {
    match std::env::current_dir() {
        Ok(cwd) => extract_at_in(&cwd, file_path, location, context_lines),
        Err(e) => format!("Error reading file: {}", e),
    }
}

/// Like [`extract_at`], resolving relative paths against `base_dir`.
pub fn extract_at_in(
    base_dir: &Path,
    file_path: &Path,
    location: StackLocation,
    context_lines: usize,
) -> String {
    render(
        base_dir,
        file_path,
        location.line,
        Some(location.column),
        context_lines,
    )
}

fn render(
    base_dir: &Path,
    file_path: &Path,
    line_number: u32,
    column: Option<u32>,
    context_lines: usize,
) -> String {
    let absolute_path = resolve_against(base_dir, file_path);
    if !absolute_path.exists() {
        return format!("File not found: {}", absolute_path.display());
    }

    let content = match fs::read_to_string(&absolute_path) {
        Ok(content) => content,
        Err(e) => return format!("Error reading file: {}", e),
    };
    let lines: Vec<&str> = content.lines().collect();

    let target = line_number as usize;
    if target < 1 || target > lines.len() {
        return format!("Invalid line number: {}", line_number);
    }

    let start = target.saturating_sub(context_lines).max(1);
    let end = (target + context_lines).min(lines.len());

    let mut rendered = Vec::with_capacity(end - start + 2);
    for number in start..=end {
        let mut line = format!(
            "{:>width$} | {}",
            number,
            lines[number - 1],
            width = LINE_NUMBER_WIDTH
        );
        if number == target {
            // The marker takes the place of the first padding character.
            line.replace_range(..1, ">");
            rendered.push(line);
            // A column past the end of the line comes from a malformed frame.
            let width = lines[number - 1].chars().count() + 1;
            if let Some(column) = column
                .map(|c| c as usize)
                .filter(|c| (1..=width).contains(c))
            {
                rendered.push(format!("{}^", " ".repeat(GUTTER_WIDTH + column - 1)));
            }
        } else {
            rendered.push(line);
        }
    }
    rendered.join("\n")
}
