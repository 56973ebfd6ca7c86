//! Domain models for task reports
//!
//! Contains the records, filters and statistics rules without any I/O concerns.

mod task;
mod filter;
mod locale;
mod stats;
mod report;

pub use task::{ParseError, Priority, Subtask, TaskRecord, TaskStatus};
pub use filter::{FilterCriteria, QUERY_DATE_FORMAT};
pub use locale::DisplayLocale;
pub use stats::{
    completion_rate, Advisory, DomainError, InsightBucket, ReportSummary, StatsSnapshot,
    EXCELLENT_THRESHOLD, GOOD_THRESHOLD,
};
pub use report::{Report, ReportState, StateError};
