//! # Log Router Module / 日志路由模块
//!
//! The router is the fan-out point between the report renderer and the sinks.
//! It is built from a `LoggingMode` and a list of sink factories, keeps only
//! the sinks the mode implies, and delivers every message to all of them in a
//! fixed order: the local sink first, then the pre-commit console.
//!
//! 路由器是报告渲染器与输出端之间的分发点。它由 `LoggingMode` 和输出端工厂列表构建，
//! 只保留模式所需的输出端，并以固定顺序将每条消息投递给所有输出端：
//! 先本地输出端，后预提交控制台。

use anyhow::{Result, bail};
use colored::*;
use std::sync::Arc;

use crate::core::config::LoggingMode;
use crate::infra::sink::{LogSink, SinkError};

/// The slot a sink fills in the router. Declaration order is delivery order.
/// 输出端在路由器中所占的位置。声明顺序即投递顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SinkRole {
    /// The suite transcript file / 套件记录文件
    Local,
    /// The `[Pre-commit] ` console stream / `[Pre-commit] ` 控制台流
    PreCommit,
}

/// Returns the roles a router in `mode` delivers to, in delivery order.
///
/// The pre-commit role is only active while a commit hook is running; in
/// `PreCommit` mode without one, the router has no sinks at all.
pub fn active_roles(mode: LoggingMode, hook_active: bool) -> Vec<SinkRole> {
    let mut roles = Vec::with_capacity(2);
    if mode.writes_local() {
        roles.push(SinkRole::Local);
    }
    if mode.writes_precommit() && hook_active {
        roles.push(SinkRole::PreCommit);
    }
    roles
}

type BuildSink = Box<dyn FnOnce() -> Result<Arc<dyn LogSink>> + Send>;

/// Deferred construction of one sink. Factories for inactive roles are never run.
/// 延迟构建单个输出端。非活动角色的工厂永远不会运行。
pub struct SinkFactory {
    role: SinkRole,
    build: BuildSink,
}

impl SinkFactory {
    pub fn new<F>(role: SinkRole, build: F) -> Self
    where
        F: FnOnce() -> Result<Arc<dyn LogSink>> + Send + 'static,
    {
        Self {
            role,
            build: Box::new(build),
        }
    }

    /// Wraps an already-built sink.
    pub fn ready(role: SinkRole, sink: Arc<dyn LogSink>) -> Self {
        Self::new(role, move || Ok(sink))
    }

    pub fn role(&self) -> SinkRole {
        self.role
    }
}

/// Outcome of one `log()` call.
/// 一次 `log()` 调用的结果。
#[derive(Debug, Default)]
pub struct Delivery {
    /// Number of sinks that accepted the message / 接受消息的输出端数量
    pub delivered: usize,
    /// Errors from the sinks that did not / 未接受消息的输出端的错误
    pub errors: Vec<SinkError>,
}

impl Delivery {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Fan-out dispatcher over the sinks implied by a mode.
/// 针对模式所需输出端的分发器。
pub struct LogRouter {
    mode: LoggingMode,
    sinks: Vec<(SinkRole, Arc<dyn LogSink>)>,
}

impl LogRouter {
    /// Builds the sinks for the roles `mode` implies, in delivery order.
    ///
    /// If a factory fails, or an active role has no factory, every sink
    /// built so far is closed before the error is returned.
    ///
    /// # Arguments
    /// * `mode` - The logging mode, fixed for this router's lifetime
    /// * `hook_active` - Whether a commit hook is running
    /// * `factories` - Candidate sinks, at most one per role is used
    pub fn build(mode: LoggingMode, hook_active: bool, mut factories: Vec<SinkFactory>) -> Result<Self> {
        let mut router = Self {
            mode,
            sinks: Vec::new(),
        };

        for role in active_roles(mode, hook_active) {
            let Some(index) = factories.iter().position(|f| f.role == role) else {
                router.close();
                bail!("No sink factory provided for the {:?} role in '{}' mode", role, mode);
            };
            let factory = factories.remove(index);
            match (factory.build)() {
                Ok(sink) => router.sinks.push((role, sink)),
                Err(e) => {
                    router.close();
                    return Err(e.context(format!("Failed to open the {:?} sink", role)));
                }
            }
        }

        Ok(router)
    }

    pub fn mode(&self) -> LoggingMode {
        self.mode
    }

    pub fn has_role(&self, role: SinkRole) -> bool {
        self.sinks.iter().any(|(r, _)| *r == role)
    }

    pub fn sink(&self, role: SinkRole) -> Option<&Arc<dyn LogSink>> {
        self.sinks.iter().find(|(r, _)| *r == role).map(|(_, s)| s)
    }

    /// Number of sinks still open.
    pub fn open_sink_count(&self) -> usize {
        self.sinks.iter().filter(|(_, s)| s.is_open()).count()
    }

    /// Delivers `message` to every sink. A failing sink is reported on
    /// stderr and does not keep the message from the others.
    ///
    /// 将 `message` 投递给每个输出端。失败的输出端会在 stderr 上报告，
    /// 且不会阻止消息投递到其他输出端。
    pub fn log(&self, message: &str) -> Delivery {
        let mut delivery = Delivery::default();
        for (_, sink) in &self.sinks {
            match sink.write(message) {
                Ok(()) => delivery.delivered += 1,
                Err(e) => {
                    warn_sink_failure(&e);
                    delivery.errors.push(e);
                }
            }
        }
        delivery
    }

    /// Closes every sink. Safe to call more than once.
    pub fn close(&self) -> Vec<SinkError> {
        let mut errors = Vec::new();
        for (_, sink) in &self.sinks {
            if let Err(e) = sink.close() {
                warn_sink_failure(&e);
                errors.push(e);
            }
        }
        errors
    }
}

impl Drop for LogRouter {
    fn drop(&mut self) {
        self.close();
    }
}

/// The side channel for sink failures.
pub(crate) fn warn_sink_failure(error: &SinkError) {
    eprintln!("{} {}", "[suite-logger] warning:".yellow(), error);
}
