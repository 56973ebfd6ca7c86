//! task-report - Task progress summaries and report exports
//!
//! Turns a filtered set of task records into completion statistics with a
//! rule-based insight, a quoted CSV export and a paginated PDF table.

pub mod domain;
pub mod export;
pub mod storage;
pub mod cli;

pub use domain::{FilterCriteria, Report, StatsSnapshot, TaskRecord};
pub use export::{ExportFormat, Exporter, FileSink};
