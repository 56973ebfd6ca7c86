//! Task data sources
//!
//! [`TaskSource`] is the read side of the task backend: stats, filtered task
//! lists and subject metadata. [`JsonTaskSource`] answers the same queries
//! from a JSON file in the backend's list-response shape.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::{DomainError, FilterCriteria, Report, StatsSnapshot, TaskRecord, TaskStatus};

/// Number of upcoming tasks returned with the stats
pub const UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read task data {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse task data {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Task backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Response of the stats query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub completed: i64,
    pub pending: i64,
    #[serde(default)]
    pub upcoming: Vec<TaskRecord>,
}

impl StatsResponse {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot::new(self.completed, self.pending)
    }
}

/// Response of the task list query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskListResponse {
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
}

/// Read access to the task backend
pub trait TaskSource {
    fn stats(&self, filters: &FilterCriteria) -> Result<StatsResponse, SourceError>;

    fn tasks(&self, filters: &FilterCriteria) -> Result<Vec<TaskRecord>, SourceError>;

    fn subjects(&self) -> Result<Vec<String>, SourceError>;
}

/// Fetches stats and tasks for `filters` and validates them into a report
///
/// Stats are validated before the task list is requested, so invalid counts
/// stop the load before anything can be exported.
pub fn fetch_report(
    source: &dyn TaskSource,
    filters: &FilterCriteria,
) -> Result<Report, LoadError> {
    let stats = source.stats(filters)?;
    stats.snapshot().summarize()?;

    let tasks = source.tasks(filters)?;
    Ok(Report::build(filters.clone(), stats.snapshot(), tasks)?)
}

/// Task source backed by a JSON file shaped like `{"tasks": [...]}`
#[derive(Debug, Clone)]
pub struct JsonTaskSource {
    path: PathBuf,
    clock: fn() -> DateTime<Utc>,
    offset: FixedOffset,
}

impl JsonTaskSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            clock: Utc::now,
            offset: Utc.fix(),
        }
    }

    /// Sets the offset whose calendar days the date filters compare
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Overrides "now" used to pick upcoming tasks
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every task in file order
    pub fn read_all(&self) -> Result<Vec<TaskRecord>, SourceError> {
        let content = fs::read_to_string(&self.path).map_err(|source| SourceError::Read {
            path: self.path.clone(),
            source,
        })?;

        let response: TaskListResponse =
            serde_json::from_str(&content).map_err(|source| SourceError::Parse {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            "Loaded {} tasks from {}",
            response.tasks.len(),
            self.path.display()
        );
        Ok(response.tasks)
    }
}

impl TaskSource for JsonTaskSource {
    fn stats(&self, filters: &FilterCriteria) -> Result<StatsResponse, SourceError> {
        let tasks = self.tasks(filters)?;
        let completed = tasks.iter().filter(|t| t.is_complete()).count() as i64;
        let pending = tasks.len() as i64 - completed;

        let now = (self.clock)();
        let mut upcoming: Vec<TaskRecord> = tasks
            .into_iter()
            .filter(|t| t.status == TaskStatus::Pending && t.deadline.is_some_and(|d| d >= now))
            .collect();
        upcoming.sort_by_key(|t| t.deadline);
        upcoming.truncate(UPCOMING_LIMIT);

        Ok(StatsResponse {
            completed,
            pending,
            upcoming,
        })
    }

    fn tasks(&self, filters: &FilterCriteria) -> Result<Vec<TaskRecord>, SourceError> {
        let all = self.read_all()?;
        let total = all.len();
        let matched: Vec<_> = all.into_iter().filter(|t| filters.matches(t, self.offset)).collect();

        debug!(
            "Filter [{}] matched {} of {} tasks",
            filters.to_query_string(),
            matched.len(),
            total
        );
        Ok(matched)
    }

    fn subjects(&self) -> Result<Vec<String>, SourceError> {
        let subjects: BTreeSet<String> = self
            .read_all()?
            .iter()
            .filter_map(|t| t.subject().map(|s| s.trim().to_string()))
            .collect();
        Ok(subjects.into_iter().collect())
    }
}
