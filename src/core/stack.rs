//! Best-effort recovery of a source position from a stack trace.
//!
//! Works with JavaScript-style frames (`at fn (/src/math.test.ts:12:5)`) and
//! Rust panic locations (`src/lib.rs:12:5`) alike: both carry a
//! `:<line>:<column>` suffix after the file name.

use once_cell::sync::Lazy;
use regex::Regex;

static LOCATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":(\d+):(\d+)").expect("LOCATION_RE regex should compile"));

/// A 1-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackLocation {
    pub line: u32,
    pub column: u32,
}

/// Finds the first location in `stack`.
///
/// With a `file_hint`, only frames whose text contains the hint are
/// considered, so the location points into the test file rather than into
/// a library frame. Returns `None` when nothing matches.
pub fn parse_location(stack: &str, file_hint: Option<&str>) -> Option<StackLocation> {
    frames_matching(stack, file_hint).find_map(parse_frame)
}

/// Stack lines that mention `file_hint` (every line when there is no hint).
pub fn frames_matching<'a>(
    stack: &'a str,
    file_hint: Option<&'a str>,
) -> impl Iterator<Item = &'a str> + 'a {
    stack
        .lines()
        .filter(move |line| file_hint.is_none_or(|hint| !hint.is_empty() && line.contains(hint)))
}

fn parse_frame(frame: &str) -> Option<StackLocation> {
    let caps = LOCATION_RE.captures(frame)?;
    let line = caps.get(1)?.as_str().parse::<u32>().ok()?;
    let column = caps.get(2)?.as_str().parse::<u32>().ok()?;
    if line == 0 {
        return None;
    }
    Some(StackLocation { line, column })
}
