//! Main CLI application structure

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{gantt, packages};
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "station-gantt")]
#[command(author, version, about = "Flattens aircraft maintenance work packages into Gantt chart data")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to default_format from global config, then json)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project config file (defaults to .station-gantt.toml here or in a parent directory)
    #[arg(long, short = 'c', global = true, env = "STATION_GANTT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Flatten work packages into Gantt tasks and links
    Gantt(gantt::GanttArgs),

    /// Inspect work package records
    #[command(subcommand)]
    Packages(packages::PackageCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    let format = cli
        .format
        .unwrap_or_else(|| config.global.default_format.into());
    let output = Output::new(format, cli.verbose).with_pretty(cli.pretty || config.global.pretty);

    output.verbose("station-gantt starting");
    if let Some(root) = &config.project_root {
        output.verbose(&format!("Project root: {}", root.display()));
    }

    match cli.command {
        Commands::Gantt(args) => gantt::run(args, &config, &output)?,
        Commands::Packages(cmd) => packages::run(cmd, &config, &output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

/// Sends diagnostics to stderr; `RUST_LOG` overrides the default level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "station_gantt=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init()
        .ok();
}
