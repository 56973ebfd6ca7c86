//! Date and time presentation
//!
//! A single configurable locale: strftime patterns plus a fixed UTC offset.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Locale used for every human-readable date in exports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayLocale {
    /// Pattern for deadlines, e.g. `3/14/2025`
    pub date_format: String,

    /// Pattern for the generation timestamp
    pub datetime_format: String,

    /// Offset applied to UTC timestamps before formatting
    pub utc_offset_minutes: i32,
}

impl Default for DisplayLocale {
    fn default() -> Self {
        Self {
            date_format: "%-m/%-d/%Y".to_string(),
            datetime_format: "%-m/%-d/%Y, %-I:%M:%S %p".to_string(),
            utc_offset_minutes: 0,
        }
    }
}

impl DisplayLocale {
    /// Returns a description of the first problem found, if any
    pub fn validate(&self) -> Result<(), String> {
        for (name, pattern) in [
            ("date_format", &self.date_format),
            ("datetime_format", &self.datetime_format),
        ] {
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(format!("{} is not a valid strftime pattern: '{}'", name, pattern));
            }
        }

        if FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).is_none() {
            return Err(format!(
                "utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            ));
        }

        Ok(())
    }

    /// Returns the configured offset, falling back to UTC when out of range
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn format_date(&self, value: &DateTime<Utc>) -> String {
        self.render(value, &self.date_format)
    }

    pub fn format_datetime(&self, value: &DateTime<Utc>) -> String {
        self.render(value, &self.datetime_format)
    }

    fn render(&self, value: &DateTime<Utc>, pattern: &str) -> String {
        let local = value.with_timezone(&self.offset());
        let mut out = String::new();
        if write!(out, "{}", local.format(pattern)).is_err() {
            out = local.to_rfc3339();
        }
        out
    }
}
