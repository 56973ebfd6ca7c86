//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `stats` | Completion rate, insight and advisories |
//! | `export csv\|pdf` | Write `tasks.csv` / `tasks.pdf` |
//! | `subjects` | Known subjects for filtering |
//! | `query` | Show the query string built from filters |
//!
//! Filters (`--subject`, `--priority`, `--status`, `--from`, `--to`) apply to
//! `stats`, `export` and `query`.
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod report;
mod export;

pub use app::{run, Cli, Commands, FilterArgs};
pub use output::{Output, OutputFormat};
pub use report::load_report;
