//! Download module.
//!
//! This module provides:
//! - The per-resource download task with ledger bookkeeping
//! - The run coordinator with bounded concurrency
//! - The run report

pub mod coordinator;
pub mod report;
pub mod task;

pub use coordinator::{CoordinatorOptions, FetchCoordinator};
pub use report::{Report, ReportCollector, ReportError};
pub use task::{DownloadTask, Outcome, TaskContext};
