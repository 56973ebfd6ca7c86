//! Main CLI application structure

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{export, report};
use crate::domain::{FilterCriteria, Priority, TaskStatus};
use crate::export::ExportFormat;
use crate::storage::{Config, JsonTaskSource};

#[derive(Parser)]
#[command(name = "task-report")]
#[command(author, version, about = "Task progress summaries and CSV/PDF exports")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Task data file (overrides `data_file` in taskreport.toml)
    #[arg(long, global = true, env = "TASK_REPORT_DATA")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show completion statistics and insights
    Stats {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Export the filtered tasks as tasks.csv or tasks.pdf
    Export {
        /// Export format
        #[arg(id = "export_format", value_name = "FORMAT")]
        format: ExportFormat,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output directory (defaults to `output_dir` in taskreport.toml)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// List known subjects
    Subjects,

    /// Print the query string the filters produce
    Query {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

/// Report filters shared by several commands
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Subject text (substring match)
    #[arg(long)]
    pub subject: Option<String>,

    /// Priority: low, medium or high
    #[arg(long)]
    pub priority: Option<Priority>,

    /// Status: pending or completed
    #[arg(long)]
    pub status: Option<TaskStatus>,

    /// Earliest deadline (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest deadline (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl FilterArgs {
    pub fn into_criteria(self) -> FilterCriteria {
        FilterCriteria {
            subject: self.subject,
            priority: self.priority,
            status: self.status,
            from: self.from,
            to: self.to,
        }
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load().context("Failed to load configuration")?;
    let output = Output::new(cli.format.unwrap_or(config.global.default_format));
    let data = cli.data.unwrap_or_else(|| config.data_path());

    debug!(
        "Project root: {:?}, data file: {}",
        config.project_root,
        data.display()
    );

    let source = JsonTaskSource::new(data).with_offset(config.locale().offset());

    match cli.command {
        Commands::Stats { filters } => report::stats(&output, &source, &filters.into_criteria()),
        Commands::Export {
            format,
            filters,
            out,
        } => {
            let out = out.unwrap_or_else(|| config.output_dir());
            export::run(&output, &config, &source, format, &filters.into_criteria(), &out)
        }
        Commands::Subjects => report::subjects(&output, &source),
        Commands::Query { filters } => {
            report::query(&output, &filters.into_criteria());
            Ok(())
        }
    }
}
