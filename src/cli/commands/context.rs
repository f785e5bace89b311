//! The `context` command: prints the excerpt the report would show for a
//! given file and line.

use std::path::Path;

use crate::core::stack::StackLocation;
use crate::reporting::context;

pub fn execute(file: &Path, line: u32, context_lines: usize, column: Option<u32>) {
    let excerpt = match column {
        Some(column) => context::extract_at(file, StackLocation { line, column }, context_lines),
        None => context::extract(file, line, context_lines),
    };
    println!("{}", excerpt);
}
