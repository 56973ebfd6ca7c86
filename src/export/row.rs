//! Export row model
//!
//! An [`ExportRow`] is the fixed five-column projection of a task used by
//! every exporter. Absent values stay absent here; each exporter decides how
//! to show them.

use serde::Serialize;

use crate::domain::{DisplayLocale, Priority, TaskRecord, TaskStatus};

/// Column headers, in export order
pub const COLUMNS: [&str; 5] = ["Title", "Subject", "Priority", "Status", "Deadline"];

/// Placeholder shown in display exports for missing values
pub const PLACEHOLDER: &str = "-";

/// One task, normalized for export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub title: String,
    pub subject: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub deadline_display: Option<String>,
}

impl ExportRow {
    /// Projects a task into its export row
    ///
    /// Never fails; text fields are copied verbatim and the deadline is
    /// formatted with the locale's date pattern.
    pub fn from_task(task: &TaskRecord, locale: &DisplayLocale) -> Self {
        Self {
            title: task.title.clone(),
            subject: task.subject.clone(),
            priority: task.priority,
            status: task.status,
            deadline_display: task.deadline.as_ref().map(|d| locale.format_date(d)),
        }
    }

    /// Cells for delimited text, absent values as empty strings
    pub fn raw_cells(&self) -> [String; 5] {
        [
            self.title.clone(),
            self.subject.clone().unwrap_or_default(),
            self.priority.to_string(),
            self.status.to_string(),
            self.deadline_display.clone().unwrap_or_default(),
        ]
    }

    /// Cells for human-facing tables, absent or empty values as `-`
    pub fn display_cells(&self) -> [String; 5] {
        let or_placeholder = |value: Option<&str>| match value {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => PLACEHOLDER.to_string(),
        };

        [
            or_placeholder(Some(self.title.as_str())),
            or_placeholder(self.subject.as_deref()),
            self.priority.to_string(),
            self.status.to_string(),
            or_placeholder(self.deadline_display.as_deref()),
        ]
    }
}

/// Projects tasks into rows, preserving order
pub fn to_export_rows(tasks: &[TaskRecord], locale: &DisplayLocale) -> Vec<ExportRow> {
    tasks
        .iter()
        .map(|task| ExportRow::from_task(task, locale))
        .collect()
}
