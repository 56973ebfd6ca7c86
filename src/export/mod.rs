//! # Export
//!
//! Turns a materialized task snapshot into downloadable artifacts.
//!
//! | Format | Artifact | Renderer |
//! |--------|----------|----------|
//! | CSV | `tasks.csv` | [`render_delimited_text`] |
//! | PDF | `tasks.pdf` | [`render_paginated_table`] + [`encode_pdf`] |
//!
//! Renderers are pure; only [`Exporter::deliver`] touches the [`FileSink`].

mod row;
mod csv;
mod table;
mod pdf;
mod sink;
mod orchestrator;

pub use row::{to_export_rows, ExportRow, COLUMNS, PLACEHOLDER};
pub use csv::render_delimited_text;
pub use table::{render_paginated_table, Document, Element, Page, PageConfig, NO_DATA, REPORT_TITLE};
pub use pdf::encode_pdf;
pub use sink::{DirectorySink, FileSink, MemorySink, SinkError};
pub use orchestrator::{Artifact, ExportError, ExportFormat, ExportOutcome, Exporter};
