//! Task domain model
//!
//! Tasks are owned by the backend; this crate only reads them. The shape
//! mirrors the backend's JSON payload so records deserialize directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Invalid priority: expected 'low', 'medium' or 'high', got '{0}'")]
    InvalidPriority(String),

    #[error("Invalid status: expected 'pending' or 'completed', got '{0}'")]
    InvalidStatus(String),
}

/// Priority of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Returns the wire value used by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ParseError::InvalidPriority(s.to_string())),
        }
    }
}

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    /// Returns true if this status represents completion
    pub fn is_complete(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    /// Returns the wire value used by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(ParseError::InvalidStatus(s.to_string())),
        }
    }
}

/// A checklist item inside a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub title: String,

    #[serde(default)]
    pub done: bool,
}

/// A task as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Human-readable title
    pub title: String,

    /// Subject the task belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub status: TaskStatus,

    /// Due date, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,

    /// Checklist carried for other views; never exported
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,
}

impl TaskRecord {
    /// Creates a pending, medium-priority task with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subject: None,
            priority: Priority::default(),
            status: TaskStatus::default(),
            deadline: None,
            subtasks: Vec::new(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns the subject if it is present and not blank
    pub fn subject(&self) -> Option<&str> {
        self.subject
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    /// Returns true if the task is completed
    pub fn is_complete(&self) -> bool {
        self.status.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn deserialize_backend_payload() {
        let json = r#"{
            "title": "Read chapter 3",
            "subject": "History",
            "priority": "high",
            "status": "completed",
            "deadline": "2025-03-14T09:30:00Z",
            "subtasks": [{"title": "Take notes", "done": true}]
        }"#;

        let task: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(task.title, "Read chapter 3");
        assert_eq!(task.subject(), Some("History"));
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(
            task.deadline,
            Some(Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap())
        );
        assert_eq!(task.subtasks.len(), 1);
        assert!(task.subtasks[0].done);
    }

    #[test]
    fn optional_fields_default() {
        let task: TaskRecord = serde_json::from_str(r#"{"title": "Bare"}"#).unwrap();

        assert!(task.subject.is_none());
        assert!(task.deadline.is_none());
        assert!(task.subtasks.is_empty());
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn blank_subject_is_absent() {
        let task = TaskRecord::new("x").with_subject("   ");
        assert!(task.subject().is_none());
    }

    #[test]
    fn parse_priority_and_status() {
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert_eq!(" low ".parse::<Priority>(), Ok(Priority::Low));
        assert!("urgent".parse::<Priority>().is_err());

        assert_eq!("completed".parse::<TaskStatus>(), Ok(TaskStatus::Completed));
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn display_uses_wire_values() {
        assert_eq!(Priority::Medium.to_string(), "medium");
        assert_eq!(TaskStatus::Pending.to_string(), "pending");
    }
}
