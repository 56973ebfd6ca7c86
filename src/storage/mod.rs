//! # Storage Layer
//!
//! Configuration and task data access.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Project config | TOML | `taskreport.toml` |
//! | Global config | TOML | `~/.config/task-report/config.toml` |
//! | Tasks | JSON (`{"tasks": [...]}`) | `tasks.json` (configurable) |
//!
//! ## Key Types
//!
//! - [`Config`] - Project and global configuration
//! - [`TaskSource`] - Read side of the task backend
//! - [`JsonTaskSource`] - File-backed [`TaskSource`]

mod config;
mod source;

pub use config::{Config, ConfigError, GlobalConfig, ProjectConfig, GLOBAL_CONFIG_ENV, PROJECT_CONFIG_FILE};
pub use source::{
    fetch_report, JsonTaskSource, LoadError, SourceError, StatsResponse, TaskListResponse,
    TaskSource, UPCOMING_LIMIT,
};
