//! Completion statistics and rule-based insights
//!
//! The completion rate is an integer percentage rounded half-up. Insights are
//! a three-way bucket on that rate plus an independent advisory whenever
//! anything is still pending.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid count: {field} must be non-negative, got {value}")]
    InvalidCount { field: &'static str, value: i64 },
}

/// Rate at or above which progress is `Excellent`
pub const EXCELLENT_THRESHOLD: u8 = 80;

/// Rate at or above which progress is `Good`
pub const GOOD_THRESHOLD: u8 = 50;

/// Computes the completion percentage for the given counts
///
/// Returns 0 when both counts are zero. Negative counts are rejected, never
/// clamped.
pub fn completion_rate(completed: i64, pending: i64) -> Result<u8, DomainError> {
    let completed = check_count("completed", completed)?;
    let pending = check_count("pending", pending)?;

    let total = completed + pending;
    if total == 0 {
        return Ok(0);
    }

    // round(100 * c / t) half-up, without floats
    let rate = (200 * completed + total) / (2 * total);
    Ok(rate as u8)
}

fn check_count(field: &'static str, value: i64) -> Result<u128, DomainError> {
    if value < 0 {
        Err(DomainError::InvalidCount { field, value })
    } else {
        Ok(value as u128)
    }
}

/// Coarse classification of a completion rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightBucket {
    Excellent,
    Good,
    NeedsFocus,
}

impl InsightBucket {
    /// Classifies a completion rate; both thresholds are inclusive
    pub fn for_rate(rate: u8) -> Self {
        if rate >= EXCELLENT_THRESHOLD {
            InsightBucket::Excellent
        } else if rate >= GOOD_THRESHOLD {
            InsightBucket::Good
        } else {
            InsightBucket::NeedsFocus
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            InsightBucket::Excellent => "Excellent Progress!",
            InsightBucket::Good => "Good Progress",
            InsightBucket::NeedsFocus => "Need Focus",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            InsightBucket::Excellent => {
                "You're maintaining a great completion rate. Keep up the excellent work!"
            }
            InsightBucket::Good => {
                "You're making steady progress. Consider breaking down larger tasks into smaller ones."
            }
            InsightBucket::NeedsFocus => {
                "Focus on completing pending tasks. Start with high-priority items and set realistic deadlines."
            }
        }
    }
}

/// Signal raised alongside the bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Advisory {
    ActionRequired { pending: u64 },
}

impl Advisory {
    pub fn headline(&self) -> &'static str {
        match self {
            Advisory::ActionRequired { .. } => "Action Required",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Advisory::ActionRequired { pending } => format!(
                "You have {} pending task{}. Review and prioritize them to stay on track.",
                pending,
                if *pending == 1 { "" } else { "s" }
            ),
        }
    }
}

/// Completed/pending counts as reported by the backend
///
/// Counts are signed so a malformed payload surfaces as `InvalidCount`
/// instead of failing deserialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub completed: i64,
    pub pending: i64,
}

impl StatsSnapshot {
    pub fn new(completed: i64, pending: i64) -> Self {
        Self { completed, pending }
    }

    /// Validates the counts and derives the full summary
    pub fn summarize(&self) -> Result<ReportSummary, DomainError> {
        let rate = completion_rate(self.completed, self.pending)?;
        // both counts are known non-negative past this point
        let completed = self.completed as u64;
        let pending = self.pending as u64;

        let mut advisories = Vec::new();
        if pending > 0 {
            advisories.push(Advisory::ActionRequired { pending });
        }

        Ok(ReportSummary {
            total: completed + pending,
            completed,
            pending,
            completion_rate: rate,
            bucket: InsightBucket::for_rate(rate),
            advisories,
        })
    }
}

/// Validated statistics with their insights
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub completion_rate: u8,
    pub bucket: InsightBucket,
    pub advisories: Vec<Advisory>,
}

impl ReportSummary {
    /// Returns true if the `ActionRequired` advisory is present
    pub fn action_required(&self) -> bool {
        self.advisories
            .iter()
            .any(|a| matches!(a, Advisory::ActionRequired { .. }))
    }
}
