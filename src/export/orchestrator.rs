//! Export orchestration
//!
//! Dispatches rows to the right renderer, names the result and hands it to
//! the sink. Rendering happens entirely in memory before the sink is
//! touched, so a failed write can be retried with the same [`Artifact`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::csv::render_delimited_text;
use super::pdf::encode_pdf;
use super::row::{to_export_rows, ExportRow};
use super::sink::{FileSink, SinkError};
use super::table::{render_paginated_table, PageConfig};
use crate::domain::{DisplayLocale, Report};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Quoted comma-separated text
    Csv,
    /// Paginated landscape table
    Pdf,
}

impl ExportFormat {
    /// Fixed artifact name for this format
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "tasks.csv",
            ExportFormat::Pdf => "tasks.pdf",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// A rendered, named payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: &'static str,
    pub format: ExportFormat,
    pub rows: usize,
    pub pages: Option<usize>,
    pub bytes: Vec<u8>,
}

/// Summary of a delivered artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportOutcome {
    pub name: &'static str,
    pub format: ExportFormat,
    pub rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<usize>,
    pub bytes: usize,
}

/// Renders rows and delivers them to a sink
///
/// Exports take `&mut self`, so one exporter never has two renders in
/// flight at once.
pub struct Exporter<S: FileSink> {
    sink: S,
    locale: DisplayLocale,
    page: PageConfig,
    clock: fn() -> DateTime<Utc>,
}

impl<S: FileSink> Exporter<S> {
    pub fn new(sink: S, locale: DisplayLocale, page: PageConfig) -> Self {
        Self {
            sink,
            locale,
            page,
            clock: Utc::now,
        }
    }

    /// Overrides the source of the generation timestamp
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn locale(&self) -> &DisplayLocale {
        &self.locale
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Renders rows in the given format without touching the sink
    pub fn render(&self, rows: &[ExportRow], format: ExportFormat) -> Artifact {
        let (bytes, pages) = match format {
            ExportFormat::Csv => (render_delimited_text(rows), None),
            ExportFormat::Pdf => {
                let generated_at = self.locale.format_datetime(&(self.clock)());
                let document = render_paginated_table(rows, &self.page, &generated_at);
                let pages = document.page_count();
                (encode_pdf(&document), Some(pages))
            }
        };

        Artifact {
            name: format.file_name(),
            format,
            rows: rows.len(),
            pages,
            bytes,
        }
    }

    /// Hands a rendered artifact to the sink
    pub fn deliver(&mut self, artifact: &Artifact) -> Result<ExportOutcome, ExportError> {
        if let Err(e) = self.sink.write(artifact.name, &artifact.bytes) {
            warn!("Export of {} failed: {}", artifact.name, e);
            return Err(e.into());
        }

        info!(
            "Exported {} ({} rows, {} bytes)",
            artifact.name,
            artifact.rows,
            artifact.bytes.len()
        );

        Ok(ExportOutcome {
            name: artifact.name,
            format: artifact.format,
            rows: artifact.rows,
            pages: artifact.pages,
            bytes: artifact.bytes.len(),
        })
    }

    /// Renders rows and delivers the result
    pub fn export_rows(
        &mut self,
        rows: &[ExportRow],
        format: ExportFormat,
    ) -> Result<ExportOutcome, ExportError> {
        let artifact = self.render(rows, format);
        self.deliver(&artifact)
    }

    /// Exports the task snapshot of a validated report
    pub fn export_report(
        &mut self,
        report: &Report,
        format: ExportFormat,
    ) -> Result<ExportOutcome, ExportError> {
        let rows = to_export_rows(&report.tasks, &self.locale);
        self.export_rows(&rows, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FilterCriteria, StatsSnapshot, TaskRecord};
    use crate::export::sink::MemorySink;
    use chrono::TimeZone;
    use std::io;

    struct FailingSink {
        attempts: usize,
    }

    impl FileSink for FailingSink {
        fn write(&mut self, name: &str, _bytes: &[u8]) -> Result<(), SinkError> {
            self.attempts += 1;
            Err(SinkError::Io {
                name: name.to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 15, 0).unwrap()
    }

    fn exporter<S: FileSink>(sink: S) -> Exporter<S> {
        Exporter::new(sink, DisplayLocale::default(), PageConfig::default()).with_clock(fixed_clock)
    }

    fn report(titles: &[&str]) -> Report {
        let tasks = titles.iter().map(|t| TaskRecord::new(*t)).collect();
        Report::build(FilterCriteria::new(), StatsSnapshot::new(0, titles.len() as i64), tasks)
            .unwrap()
    }

    #[test]
    fn csv_export_uses_fixed_name() {
        let mut exporter = exporter(MemorySink::new());

        let outcome = exporter
            .export_report(&report(&["One", "Two"]), ExportFormat::Csv)
            .unwrap();

        assert_eq!(outcome.name, "tasks.csv");
        assert_eq!(outcome.rows, 2);
        assert_eq!(outcome.pages, None);

        let csv = String::from_utf8(exporter.sink().get("tasks.csv").unwrap().to_vec()).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert_eq!(outcome.bytes, csv.len());
    }

    #[test]
    fn pdf_export_stamps_generation_time() {
        let mut exporter = exporter(MemorySink::new());

        let outcome = exporter
            .export_report(&report(&[]), ExportFormat::Pdf)
            .unwrap();

        assert_eq!(outcome.name, "tasks.pdf");
        assert_eq!(outcome.pages, Some(1));

        let pdf = exporter.sink().get("tasks.pdf").unwrap();
        let text = String::from_utf8_lossy(pdf);
        assert!(text.contains("(Generated: 6/1/2025, 9:15:00 AM) Tj"));
        assert!(text.contains("(No data) Tj"));
    }

    #[test]
    fn failing_sink_reports_failure() {
        let mut exporter = exporter(FailingSink { attempts: 0 });

        let result = exporter.export_report(&report(&["x"]), ExportFormat::Csv);

        assert!(matches!(result, Err(ExportError::Sink(SinkError::Io { .. }))));
        assert_eq!(exporter.sink().attempts, 1);
    }

    #[test]
    fn artifact_can_be_retried() {
        let rows = to_export_rows(&[TaskRecord::new("Retry me")], &DisplayLocale::default());
        let mut failing = exporter(FailingSink { attempts: 0 });
        let artifact = failing.render(&rows, ExportFormat::Csv);
        assert!(failing.deliver(&artifact).is_err());

        let mut working = exporter(MemorySink::new());
        let outcome = working.deliver(&artifact).unwrap();

        assert_eq!(outcome.rows, 1);
        assert_eq!(working.sink().get("tasks.csv"), Some(artifact.bytes.as_slice()));
    }

    #[test]
    fn render_is_deterministic_with_fixed_clock() {
        let exporter = exporter(MemorySink::new());
        let rows = to_export_rows(&[TaskRecord::new("Same")], exporter.locale());

        let a = exporter.render(&rows, ExportFormat::Pdf);
        let b = exporter.render(&rows, ExportFormat::Pdf);
        assert_eq!(a, b);
    }

    #[test]
    fn borrowed_sink_keeps_artifacts_with_caller() {
        let mut sink = MemorySink::new();
        {
            let mut exporter = exporter(&mut sink);
            exporter
                .export_report(&report(&["Kept"]), ExportFormat::Csv)
                .unwrap();
        }
        assert!(sink.get("tasks.csv").is_some());
    }
}
