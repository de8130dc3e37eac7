//! Arguments shared by commands that read work packages

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::storage::{Config, RecordQuery, RecordSource, MAX_LIMIT};

/// Location of the work package records
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Work package file (.json, .jsonl or .yaml); defaults to source.path from config
    #[arg(long, short = 'i', env = "STATION_GANTT_INPUT")]
    pub input: Option<PathBuf>,
}

impl InputArgs {
    /// Opens the record source named on the command line or in config
    pub fn open(&self, config: &Config) -> Result<RecordSource> {
        let path = self
            .input
            .clone()
            .or_else(|| config.source_path())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No record source given. Pass --input or set source.path in .station-gantt.toml"
                )
            })?;

        RecordSource::open(&path)
            .with_context(|| format!("Failed to open record source: {}", path.display()))
    }
}

/// Parses a `--limit` value, accepting the same range as `source.limit`
pub fn parse_limit(s: &str) -> Result<usize, String> {
    let limit: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", s))?;

    if (1..=MAX_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(format!("must be between 1 and {}, got {}", MAX_LIMIT, limit))
    }
}

/// Work package filters
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only work packages for this aircraft
    #[arg(long)]
    pub aircraft_id: Option<i64>,

    /// Only the work package with this id
    #[arg(long)]
    pub work_package_id: Option<i64>,

    /// Only work packages at this station
    #[arg(long)]
    pub location_code: Option<String>,

    /// Only historic (true) or current (false) work packages
    #[arg(long)]
    pub historic: Option<bool>,
}

impl FilterArgs {
    /// Builds a query carrying these filters and default paging
    pub fn query(&self) -> RecordQuery {
        RecordQuery::new()
            .aircraft(self.aircraft_id)
            .work_package(self.work_package_id)
            .location(self.location_code.clone())
            .historic(self.historic)
    }
}
