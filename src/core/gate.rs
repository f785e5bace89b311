//! Pre-commit gating.
//!
//! In a commit-hook run a failing suite must stop the commit. The core never
//! exits the process itself: it logs the verdict and hands it back, and the
//! caller decides how to terminate (the CLI exits with status 1 after
//! closing every handle).

use crate::core::lifecycle::RouterHandle;
use crate::core::models::SuiteSummary;

pub const ABORT_MESSAGE: &str = "Tests failed. Commit aborted.";

/// What the caller should do after a suite was flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Proceed,
    /// Stop the host process with a non-zero status.
    Abort,
}

/// Logs the pre-commit result line and decides whether the commit must stop.
/// Handles without an active pre-commit sink always proceed.
pub fn pre_commit_verdict(handle: &RouterHandle, summary: &SuiteSummary) -> Verdict {
    if !handle.precommit_active() {
        return Verdict::Proceed;
    }

    handle.log(&format!(
        "Test Results: {} failed, {} passed, {} total.",
        summary.failed, summary.passed, summary.total
    ));

    if summary.has_failures() {
        handle.log(ABORT_MESSAGE);
        Verdict::Abort
    } else {
        Verdict::Proceed
    }
}
