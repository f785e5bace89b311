//! # Log Sink Module / 日志输出端模块
//!
//! A `LogSink` is one writable destination for report messages. Two variants
//! exist: `FileSink` (transcript and failure log files) and `ConsoleSink`
//! (standard output, optionally tagged with a prefix).
//!
//! 一个 `LogSink` 是报告消息的一个可写目标。有两种实现：
//! `FileSink`（记录文件和失败日志文件）和 `ConsoleSink`（标准输出，可带前缀）。
//!
//! Every sink guards its writer with a mutex. Holding the lock for a whole
//! message keeps concurrent writers from interleaving partial lines, and the
//! writer is dropped on close, which makes the `Open -> Closed` transition
//! one-way: later writes return [`SinkError::Closed`].

use chrono::{SecondsFormat, Utc};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::infra::fs::ensure_parent_dir;

/// Literal tag in front of every pre-commit console message.
/// 每条预提交控制台消息前的字面标签。
pub const PRECOMMIT_PREFIX: &str = "[Pre-commit] ";

/// Errors reported by a sink. Both are recoverable: the router reports them
/// and carries on with the remaining sinks.
/// 输出端报告的错误。两者均可恢复。
#[derive(Debug)]
pub enum SinkError {
    /// The sink was already closed when the write arrived.
    /// 写入到达时输出端已关闭。
    Closed { sink: String },
    /// The underlying writer failed.
    /// 底层写入器失败。
    Io { sink: String, source: io::Error },
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Closed { sink } => write!(f, "write to closed sink '{}' was dropped", sink),
            SinkError::Io { sink, source } => write!(f, "sink '{}' failed: {}", sink, source),
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SinkError::Io { source, .. } => Some(source),
            SinkError::Closed { .. } => None,
        }
    }
}

/// A single output destination.
/// 单个输出目标。
pub trait LogSink: Send + Sync {
    /// Short name used in warnings, e.g. the file path or `"console"`.
    fn label(&self) -> &str;

    /// Writes one message followed by a newline.
    fn write(&self, message: &str) -> Result<(), SinkError>;

    /// Flushes and releases the underlying writer. Calling it again is a no-op.
    fn close(&self) -> Result<(), SinkError>;

    fn is_open(&self) -> bool;
}

/// How a `FileSink` treats existing content when it opens.
/// `FileSink` 打开时如何处理已有内容。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Overwrite,
    Append,
}

/// A sink writing newline-terminated messages to a file.
/// 将以换行结尾的消息写入文件的输出端。
pub struct FileSink {
    path: PathBuf,
    label: String,
    timestamped: bool,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl FileSink {
    /// Creates parent directories as needed and opens `path`.
    /// 根据需要创建父目录并打开 `path`。
    pub fn open(path: &Path, mode: FileMode, timestamped: bool) -> io::Result<Self> {
        ensure_parent_dir(path)?;
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            FileMode::Overwrite => options.write(true).truncate(true),
            FileMode::Append => options.append(true),
        };
        let file = options.open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            label: path.display().to_string(),
            timestamped,
            writer: Mutex::new(Some(BufWriter::new(file))),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, Option<BufWriter<File>>> {
        // A panic while holding the lock leaves the writer usable; keep going.
        self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn io_error(&self, source: io::Error) -> SinkError {
        SinkError::Io {
            sink: self.label.clone(),
            source,
        }
    }
}

impl LogSink for FileSink {
    fn label(&self) -> &str {
        &self.label
    }

    fn write(&self, message: &str) -> Result<(), SinkError> {
        let mut guard = self.lock();
        let writer = guard.as_mut().ok_or_else(|| SinkError::Closed {
            sink: self.label.clone(),
        })?;
        let line = if self.timestamped {
            format!(
                "{} - {}\n",
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                message
            )
        } else {
            format!("{}\n", message)
        };
        writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| self.io_error(e))
    }

    fn close(&self) -> Result<(), SinkError> {
        match self.lock().take() {
            Some(mut writer) => writer.flush().map_err(|e| self.io_error(e)),
            None => Ok(()),
        }
    }

    fn is_open(&self) -> bool {
        self.lock().is_some()
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// A sink writing to standard output (or any writer, for tests), each message
/// tagged once with an optional prefix.
/// 写入标准输出（测试时可为任意写入器）的输出端，每条消息可带一次前缀。
pub struct ConsoleSink {
    label: String,
    prefix: String,
    writer: Mutex<Option<Box<dyn Write + Send>>>,
}

impl ConsoleSink {
    pub fn stdout(prefix: impl Into<String>) -> Self {
        Self::with_writer(prefix, Box::new(io::stdout()))
    }

    /// The pre-commit console sink: stdout, tagged `[Pre-commit] `.
    pub fn precommit() -> Self {
        Self::stdout(PRECOMMIT_PREFIX)
    }

    pub fn with_writer(prefix: impl Into<String>, writer: Box<dyn Write + Send>) -> Self {
        Self {
            label: "console".to_string(),
            prefix: prefix.into(),
            writer: Mutex::new(Some(writer)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Box<dyn Write + Send>>> {
        self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LogSink for ConsoleSink {
    fn label(&self) -> &str {
        &self.label
    }

    fn write(&self, message: &str) -> Result<(), SinkError> {
        let mut guard = self.lock();
        let writer = guard.as_mut().ok_or_else(|| SinkError::Closed {
            sink: self.label.clone(),
        })?;
        // One prefix per message, however many lines it spans.
        let tagged = format!("{}{}\n", self.prefix, message);
        writer
            .write_all(tagged.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|source| SinkError::Io {
                sink: self.label.clone(),
                source,
            })
    }

    fn close(&self) -> Result<(), SinkError> {
        match self.lock().take() {
            Some(mut writer) => writer.flush().map_err(|source| SinkError::Io {
                sink: self.label.clone(),
                source,
            }),
            None => Ok(()),
        }
    }

    fn is_open(&self) -> bool {
        self.lock().is_some()
    }
}
