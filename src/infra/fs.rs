//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides the small set of file system helpers the engine
//! needs: provisioning log directories and resolving paths against a base.
//!
//! 此模块提供引擎所需的少量文件系统工具：
//! 创建日志目录以及基于基础目录解析路径。

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Creates the parent directory of `path` (and its ancestors) if missing.
///
/// # Arguments
/// * `path` - A file path whose parent should exist afterwards
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Creates `dir` and its ancestors, with the path in the error message.
///
/// # Arguments
/// * `dir` - Directory to provision
///
/// # Returns
/// A `Result` indicating success or failure
pub fn provision_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))
}

/// Checks if a path exists and is a directory.
pub fn is_directory(path: &Path) -> bool {
    path.exists() && path.is_dir()
}

/// Joins a relative `path` onto `base_dir`; absolute paths are returned as-is.
pub fn resolve_against(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
