//! Report filter criteria
//!
//! Only fields that are present take part in the upstream query. The
//! inclusion rule for every field is spelled out in [`FilterCriteria::to_query_pairs`].

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::task::{Priority, TaskRecord, TaskStatus};

/// Date format used on the wire for `from`/`to`
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Optional filters for stats and task queries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Subject text; matched by substring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    /// Inclusive lower bound on the deadline date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,

    /// Inclusive upper bound on the deadline date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

impl FilterCriteria {
    /// Creates criteria that match everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the subject if it is set to something other than whitespace
    pub fn subject(&self) -> Option<&str> {
        self.subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Returns true if no filter participates in the query
    pub fn is_empty(&self) -> bool {
        self.to_query_pairs().is_empty()
    }

    /// Builds the query parameters in the fixed order
    /// `subject, priority, status, from, to`
    ///
    /// - `subject`: included when non-blank, trimmed
    /// - `priority`, `status`: included when set, as their wire value
    /// - `from`, `to`: included when set, as `YYYY-MM-DD`
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(subject) = self.subject() {
            pairs.push(("subject", subject.to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(from) = self.from {
            pairs.push(("from", from.format(QUERY_DATE_FORMAT).to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.format(QUERY_DATE_FORMAT).to_string()));
        }

        pairs
    }

    /// Encodes the query parameters as `k=v&k=v`
    pub fn to_query_string(&self) -> String {
        self.to_query_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Resolves the criteria against a single task the way the backend does
    ///
    /// Subject matching is a case-insensitive substring test. Date bounds
    /// compare the deadline's calendar day at `offset`, the same day the
    /// exports display. Tasks without a deadline never satisfy a date bound.
    pub fn matches(&self, task: &TaskRecord, offset: FixedOffset) -> bool {
        if let Some(needle) = self.subject() {
            let needle = needle.to_lowercase();
            let hit = task
                .subject()
                .map(|s| s.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !hit {
                return false;
            }
        }

        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }

        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }

        if self.from.is_some() || self.to.is_some() {
            let Some(day) = task.deadline.map(|d| d.with_timezone(&offset).date_naive()) else {
                return false;
            };
            if self.from.is_some_and(|from| day < from) {
                return false;
            }
            if self.to.is_some_and(|to| day > to) {
                return false;
            }
        }

        true
    }
}
