//! # Result Aggregator Module / 结果聚合模块
//!
//! Accumulates `TestResult`s for one suite and turns them into a report on
//! flush. Flushing is destructive: accumulated results are cleared, so one
//! aggregator can serve several suites in sequence without leaking entries
//! from one report into the next.
//!
//! 为单个套件累积 `TestResult`，并在刷新时生成报告。刷新是破坏性的：
//! 已累积的结果会被清除，因此一个聚合器可以依次服务多个套件而不会串扰。

use chrono::Utc;
use std::collections::HashMap;

use crate::core::lifecycle::RouterHandle;
use crate::core::models::{SuiteReport, SuiteSummary, TestResult};
use crate::core::router::warn_sink_failure;
use crate::reporting::render::{self, ReportOptions};

/// The rendered output of a flush.
/// 一次刷新的渲染输出。
#[derive(Debug, Clone)]
pub struct FlushedReport {
    pub text: String,
    pub summary: SuiteSummary,
}

/// Collects results for the current suite. Owned by the suite run; not shared.
/// 收集当前套件的结果。由套件运行独占，不共享。
#[derive(Debug, Default)]
pub struct ResultAggregator {
    results: Vec<TestResult>,
    options: ReportOptions,
}

impl ResultAggregator {
    pub fn new(options: ReportOptions) -> Self {
        Self {
            results: Vec::new(),
            options,
        }
    }

    /// Accumulates one result.
    pub fn record(&mut self, result: TestResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Renders the report with this aggregator's own options and clears.
    pub fn flush_report(&mut self) -> FlushedReport {
        let options = self.options.clone();
        self.flush_report_with(&options)
    }

    /// Renders the report with `options` and clears.
    pub fn flush_report_with(&mut self, options: &ReportOptions) -> FlushedReport {
        let reports = group_results(std::mem::take(&mut self.results));
        let summary = SuiteSummary::from_reports(&options.suite_name, &reports);
        let text = render::render_report(&reports, &summary, options);
        FlushedReport { text, summary }
    }

    /// Renders the report with the handle's options, delivers it through the
    /// handle, appends the failure-log entry and clears.
    ///
    /// 使用句柄的选项渲染报告，通过句柄投递，追加失败日志条目并清除。
    pub fn flush(&mut self, handle: &RouterHandle) -> SuiteSummary {
        let FlushedReport { text, summary } = self.flush_report_with(handle.report_options());
        handle.log(&text);
        if handle.has_failure_log() {
            let entry = render::failure_log_entry(&summary, Utc::now());
            if let Err(e) = handle.append_failure_entry(&entry) {
                warn_sink_failure(&e);
            }
        }
        summary
    }
}

/// Groups results by test name. Groups keep first-seen order and entries
/// keep insertion order; every result lands in exactly one group.
///
/// 按测试名称分组。分组保持首次出现的顺序，条目保持插入顺序；每个结果恰好进入一个分组。
pub fn group_results(results: Vec<TestResult>) -> Vec<SuiteReport> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<TestResult>)> = Vec::new();

    for result in results {
        match index.get(&result.test_name) {
            Some(&i) => groups[i].1.push(result),
            None => {
                index.insert(result.test_name.clone(), groups.len());
                groups.push((result.test_name.clone(), vec![result]));
            }
        }
    }

    groups
        .into_iter()
        .map(|(name, entries)| SuiteReport::new(name, entries))
        .collect()
}
