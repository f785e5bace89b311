//! # Core Module / 核心模块
//!
//! This module contains the core of the logging engine: the data models,
//! configuration, result aggregation, sink routing and the lifecycle that
//! brackets a suite run.
//!
//! 此模块包含日志引擎的核心：数据模型、配置、结果聚合、
//! 输出端路由以及包裹套件运行的生命周期管理。

pub mod aggregator;
pub mod config;
pub mod gate;
pub mod lifecycle;
pub mod models;
pub mod panic_guard;
pub mod router;
pub mod stack;

// Re-exports
pub use aggregator::ResultAggregator;
pub use config::{LoggingConfig, LoggingMode};
pub use lifecycle::{LifecycleManager, RouterHandle};
pub use models::TestResult;
