//! Configuration handling for task-report
//!
//! Configuration is stored in `taskreport.toml` (project, found by walking up
//! from the current directory) and `~/.config/task-report/config.toml`
//! (global). The global path can be overridden with `TASK_REPORT_GLOBAL_CONFIG`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::OutputFormat;
use crate::domain::DisplayLocale;
use crate::export::PageConfig;

/// Project configuration file name
pub const PROJECT_CONFIG_FILE: &str = "taskreport.toml";

/// Environment variable overriding the global config path
pub const GLOBAL_CONFIG_ENV: &str = "TASK_REPORT_GLOBAL_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Task data file, relative to the project root
    pub data_file: PathBuf,

    /// Directory exports are written to, relative to the project root
    pub output_dir: PathBuf,

    /// Overrides the global locale when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<DisplayLocale>,

    /// Page layout for PDF exports
    pub layout: PageConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("tasks.json"),
            output_dir: PathBuf::from("."),
            locale: None,
            layout: PageConfig::default(),
        }
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    pub locale: DisplayLocale,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let (project, project_root) = Self::load_project()?;

        let config = Self {
            project,
            global,
            project_root,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        let config = Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(GLOBAL_CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("dev", "task-report", "task-report")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_path = match Self::global_config_path() {
            Some(path) => path,
            None => return Ok(GlobalConfig::default()),
        };

        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Finds and loads project configuration
    fn load_project() -> Result<(ProjectConfig, Option<PathBuf>)> {
        match Self::find_project_root() {
            Some(root) => {
                let config = Self::load_project_config(&root)?;
                Ok((config, Some(root)))
            }
            None => Ok((ProjectConfig::default(), None)),
        }
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(PROJECT_CONFIG_FILE);

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")
    }

    /// Finds the project root by looking for `taskreport.toml`
    pub fn find_project_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join(PROJECT_CONFIG_FILE).is_file() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Checks locale patterns and page layout
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.locale()
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("locale: {}", e)))?;
        self.project
            .layout
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("layout: {}", e)))
    }

    /// Effective locale: project override, else global
    pub fn locale(&self) -> &DisplayLocale {
        self.project.locale.as_ref().unwrap_or(&self.global.locale)
    }

    /// Base directory for relative paths
    pub fn base_dir(&self) -> PathBuf {
        self.project_root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolved task data file
    pub fn data_path(&self) -> PathBuf {
        self.base_dir().join(&self.project.data_file)
    }

    /// Resolved export directory
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir().join(&self.project.output_dir)
    }
}
