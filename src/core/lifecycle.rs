//! # Lifecycle Module / 生命周期模块
//!
//! `LifecycleManager` owns every file handle the engine opens. `open()`
//! provisions the log directories, builds the router for a suite and hands
//! back a `RouterHandle`; `close()` releases it. Nothing is kept in global
//! state: the manager and its handles are plain owned values, and both
//! release their sinks when dropped, so an early return or a panic that
//! unwinds past them still closes every file.
//!
//! `LifecycleManager` 拥有引擎打开的所有文件句柄。`open()` 创建日志目录，
//! 为套件构建路由器并返回 `RouterHandle`；`close()` 释放它。
//! 没有任何全局状态：管理器及其句柄在被丢弃时都会关闭其输出端。
//!
//! ## State Machine / 状态机
//!
//! Per target (transcript path): `Uninitialized -> Open -> Closed`.
//! Opening a target that is already open with the same configuration
//! returns the existing handle, so no file is opened (or truncated) twice.
//! Opening it with a different configuration is an error; close it first.

use anyhow::{Context, Result, bail};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::core::config::{LoggingConfig, LoggingMode};
use crate::core::router::{Delivery, LogRouter, SinkFactory, SinkRole, warn_sink_failure};
use crate::infra::fs::{is_directory, provision_dir};
use crate::infra::sink::{ConsoleSink, FileMode, FileSink, LogSink, PRECOMMIT_PREFIX, SinkError};
use crate::reporting::render::ReportOptions;

/// Produces the writer behind a pre-commit console sink.
pub type ConsoleWriterFactory = Arc<dyn Fn() -> Box<dyn Write + Send> + Send + Sync>;

struct HandleInner {
    target: PathBuf,
    config: LoggingConfig,
    options: ReportOptions,
    router: LogRouter,
    failure_log: Mutex<Option<Arc<FileSink>>>,
    closed: AtomicBool,
}

impl HandleInner {
    fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.router.close();
        let failure_log = self
            .failure_log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        // The failure log may be shared with other suites of the run; it is
        // closed when the last holder lets go of it.
        if let Some(sink) = failure_log {
            if Arc::strong_count(&sink) == 1 {
                if let Err(e) = sink.close() {
                    warn_sink_failure(&e);
                }
            }
        }
    }
}

impl Drop for HandleInner {
    fn drop(&mut self) {
        self.close();
    }
}

/// A ready-to-use router for one suite, returned by [`LifecycleManager::open`].
/// Clones share the same sinks.
///
/// 由 [`LifecycleManager::open`] 返回的单个套件可用路由器。克隆共享相同的输出端。
#[derive(Clone)]
pub struct RouterHandle {
    inner: Arc<HandleInner>,
}

impl RouterHandle {
    /// Delivers `message` to every active sink.
    pub fn log(&self, message: &str) -> Delivery {
        self.inner.router.log(message)
    }

    /// Writes `[DEBUG] <message>` to stdout and to the suite transcript.
    /// 将 `[DEBUG] <message>` 写入标准输出和套件记录文件。
    pub fn debug(&self, message: &str) {
        let line = format!("[DEBUG] {}", message);
        println!("{}", line);
        if let Some(sink) = self.inner.router.sink(SinkRole::Local) {
            if let Err(e) = sink.write(&line) {
                warn_sink_failure(&e);
            }
        }
    }

    /// Appends an entry to the cumulative failure log. A handle without a
    /// failure log (pre-commit only) accepts and drops the entry.
    pub fn append_failure_entry(&self, entry: &str) -> Result<(), SinkError> {
        let guard = self
            .inner
            .failure_log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match guard.as_ref() {
            Some(sink) => sink.write(entry),
            None if self.is_closed() => Err(SinkError::Closed {
                sink: "failure log".to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Closes every sink owned by this handle. Calling it again is a no-op.
    pub fn close(&self) {
        self.inner.close();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    pub fn mode(&self) -> LoggingMode {
        self.inner.router.mode()
    }

    /// Whether messages reach the pre-commit console.
    pub fn precommit_active(&self) -> bool {
        self.inner.router.has_role(SinkRole::PreCommit)
    }

    pub fn has_failure_log(&self) -> bool {
        self.inner
            .failure_log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }

    /// Transcript path this handle was opened for.
    pub fn target(&self) -> &Path {
        &self.inner.target
    }

    pub fn report_options(&self) -> &ReportOptions {
        &self.inner.options
    }

    /// Open sinks owned by this handle, counting the failure log.
    pub fn open_sink_count(&self) -> usize {
        let failure_log_open = self
            .inner
            .failure_log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .is_some_and(|s| s.is_open());
        self.inner.router.open_sink_count() + usize::from(failure_log_open)
    }

    fn same_as(&self, other: &RouterHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Opens and closes `RouterHandle`s, and owns every handle it opened.
/// 打开和关闭 `RouterHandle`，并拥有其打开的每个句柄。
pub struct LifecycleManager {
    base_dir: PathBuf,
    handles: HashMap<PathBuf, RouterHandle>,
    failure_logs: HashMap<PathBuf, Weak<FileSink>>,
    truncated: HashSet<PathBuf>,
    console_writer: Option<ConsoleWriterFactory>,
}

impl LifecycleManager {
    /// Creates a manager resolving log folders against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            handles: HashMap::new(),
            failure_logs: HashMap::new(),
            truncated: HashSet::new(),
            console_writer: None,
        }
    }

    /// Sends pre-commit console output to the writers `factory` produces
    /// instead of stdout.
    pub fn with_console_writer(mut self, factory: ConsoleWriterFactory) -> Self {
        self.console_writer = Some(factory);
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Opens the sinks `config` implies and returns a handle to them.
    ///
    /// If the target is already open with an equal `config`, the existing
    /// handle is returned. On any configuration error nothing stays open.
    ///
    /// # Arguments
    /// * `config` - The logging configuration for one suite
    ///
    /// # Errors
    /// Fails when a log directory cannot be created or a file cannot be opened,
    /// or when the target is already open with a different configuration.
    pub fn open(&mut self, config: &LoggingConfig) -> Result<RouterHandle> {
        let target = config.transcript_path(&self.base_dir);

        if let Some(existing) = self.handles.get(&target) {
            if !existing.is_closed() {
                if existing.inner.config != *config {
                    bail!(
                        "Logging target is already open with a different configuration: {}",
                        target.display()
                    );
                }
                return Ok(existing.clone());
            }
            self.handles.remove(&target);
        }

        if config.mode.writes_local() {
            let log_root = config.log_root(&self.base_dir);
            if log_root.exists() && !is_directory(&log_root) {
                bail!("Log folder is not a directory: {}", log_root.display());
            }
            if let Some(suite_dir) = target.parent() {
                provision_dir(suite_dir)?;
            }
        }

        let router = LogRouter::build(config.mode, config.hook_active, self.factories(config, &target))
            .with_context(|| format!("Failed to open logging target: {}", target.display()))?;

        // Any error from here on drops `router`, which closes its sinks.
        let failure_log = if config.mode.writes_local() {
            Some(self.failure_log(config)?)
        } else {
            None
        };

        let handle = RouterHandle {
            inner: Arc::new(HandleInner {
                target: target.clone(),
                config: config.clone(),
                options: ReportOptions::from_config(config, &self.base_dir),
                router,
                failure_log: Mutex::new(failure_log),
                closed: AtomicBool::new(false),
            }),
        };
        self.handles.insert(target, handle.clone());
        Ok(handle)
    }

    /// Closes `handle` if this manager opened it. Unknown or already-closed
    /// handles are ignored.
    pub fn close(&mut self, handle: &RouterHandle) {
        let owned = self
            .handles
            .get(handle.target())
            .is_some_and(|h| h.same_as(handle));
        if owned {
            if let Some(h) = self.handles.remove(handle.target()) {
                h.close();
            }
        }
    }

    /// Closes every handle this manager still owns.
    pub fn close_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.close();
        }
    }

    /// Number of open sinks across every handle, failure logs included
    /// (a shared failure log counts once).
    pub fn open_sink_count(&self) -> usize {
        let router_sinks: usize = self
            .handles
            .values()
            .map(|h| h.inner.router.open_sink_count())
            .sum();
        let failure_logs = self
            .failure_logs
            .values()
            .filter_map(Weak::upgrade)
            .filter(|s| s.is_open())
            .count();
        router_sinks + failure_logs
    }

    /// Number of targets currently open.
    pub fn open_handle_count(&self) -> usize {
        self.handles.values().filter(|h| !h.is_closed()).count()
    }

    fn factories(&self, config: &LoggingConfig, target: &Path) -> Vec<SinkFactory> {
        let transcript = target.to_path_buf();
        let timestamped = config.timestamp_lines;
        let console_writer = self.console_writer.clone();

        vec![
            SinkFactory::new(SinkRole::Local, move || {
                let sink = FileSink::open(&transcript, FileMode::Overwrite, timestamped)
                    .with_context(|| format!("Failed to open transcript: {}", transcript.display()))?;
                Ok(Arc::new(sink) as Arc<dyn LogSink>)
            }),
            SinkFactory::new(SinkRole::PreCommit, move || {
                let sink = match console_writer {
                    Some(factory) => ConsoleSink::with_writer(PRECOMMIT_PREFIX, factory()),
                    None => ConsoleSink::precommit(),
                };
                Ok(Arc::new(sink) as Arc<dyn LogSink>)
            }),
        ]
    }

    /// Returns the failure log shared by every suite writing under the same
    /// log folder, opening it on first use.
    fn failure_log(&mut self, config: &LoggingConfig) -> Result<Arc<FileSink>> {
        let path = config.failure_log_path(&self.base_dir);
        if let Some(sink) = self.failure_logs.get(&path).and_then(Weak::upgrade) {
            if sink.is_open() {
                return Ok(sink);
            }
        }

        let mode = if config.truncate_failure_log && self.truncated.insert(path.clone()) {
            FileMode::Overwrite
        } else {
            FileMode::Append
        };
        let sink = Arc::new(
            FileSink::open(&path, mode, false)
                .with_context(|| format!("Failed to open failure log: {}", path.display()))?,
        );
        self.failure_logs.insert(path, Arc::downgrade(&sink));
        Ok(sink)
    }
}

impl Drop for LifecycleManager {
    fn drop(&mut self) {
        self.close_all();
    }
}
