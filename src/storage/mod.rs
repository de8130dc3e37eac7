//! # Storage Layer
//!
//! Supplies work package records to the flatten engine and loads
//! configuration.
//!
//! ## Record Formats
//!
//! | Extension | Format |
//! |-----------|--------|
//! | `.json` | JSON array of work packages |
//! | `.jsonl`, `.ndjson` | One work package per line |
//! | `.yaml`, `.yml` | YAML sequence of work packages |
//!
//! ## Configuration Files
//!
//! | Scope | Location |
//! |-------|----------|
//! | Project | `.station-gantt.toml` in the current directory or a parent |
//! | Global | `config.toml` in the platform config directory |
//!
//! ## Key Types
//!
//! - [`RecordSource`] - Reads, filters, sorts and pages work packages
//! - [`RecordQuery`] - Filter and paging settings
//! - [`Config`] - Project and global configuration

mod config;
mod source;

pub use config::{
    Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, SourceConfig,
    DEFAULT_EMPTY_MESSAGE, PROJECT_CONFIG_FILE,
};
pub use source::{
    Fetched, RecordFormat, RecordQuery, RecordSource, SortOrder, SourceError, SourceWarning,
    MAX_LIMIT,
};
