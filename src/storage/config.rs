//! Configuration handling for station-gantt
//!
//! Configuration is stored in `.station-gantt.toml` (project, found by
//! walking up from the current directory) and
//! `~/.config/station-gantt/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::source::{SortOrder, MAX_LIMIT};

/// File name of the project configuration
pub const PROJECT_CONFIG_FILE: &str = ".station-gantt.toml";

/// Message sent with an empty chart
pub const DEFAULT_EMPTY_MESSAGE: &str =
    "No tasks found. Ensure work packages have SchedStartDateTime and SchedEndDateTime set.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Where work packages come from and how many to take
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceConfig {
    /// Record file, relative to the project root
    pub path: Option<PathBuf>,

    /// Max work packages per query
    pub limit: usize,

    /// Ordering applied before the limit
    pub sort: SortOrder,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: None,
            limit: MAX_LIMIT,
            sort: SortOrder::SchedStartAsc,
        }
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectConfig {
    pub source: SourceConfig,

    /// Message attached to an empty chart
    pub empty_message: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
        }
    }
}

impl ProjectConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.source.limit == 0 || self.source.limit > MAX_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "source.limit must be between 1 and {}, got {}",
                MAX_LIMIT, self.source.limit
            )));
        }
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (json or text)
    pub default_format: OutputFormat,

    /// Pretty-print JSON output
    pub pretty: bool,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
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
        let project_root = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::find_project_root(&cwd));

        let project = match &project_root {
            Some(root) => Self::load_project_file(&root.join(PROJECT_CONFIG_FILE))?,
            None => ProjectConfig::default(),
        };

        Ok(Self {
            project,
            global,
            project_root,
        })
    }

    /// Loads configuration with an explicit project file
    ///
    /// Relative paths in the file resolve against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let global = Self::load_global()?;
        let project = Self::load_project_file(path)?;
        let project_root = path
            .parent()
            .map(|p| if p.as_os_str().is_empty() { Path::new(".") } else { p })
            .map(Path::to_path_buf);

        Ok(Self {
            project,
            global,
            project_root,
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "station-monitor", "station-gantt")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads and validates a project configuration file
    fn load_project_file(config_path: &Path) -> Result<ProjectConfig> {
        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;

        config
            .validate()
            .with_context(|| format!("Invalid project config: {}", config_path.display()))?;

        Ok(config)
    }

    /// Finds the project root by looking for `.station-gantt.toml` in
    /// `start` and its ancestors
    pub fn find_project_root(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(PROJECT_CONFIG_FILE).is_file() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns the configured record file, resolved against the project root
    pub fn source_path(&self) -> Option<PathBuf> {
        let path = self.project.source.path.as_ref()?;
        match &self.project_root {
            Some(root) if path.is_relative() => Some(root.join(path)),
            _ => Some(path.clone()),
        }
    }
}
