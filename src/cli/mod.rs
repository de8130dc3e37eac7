//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `gantt` | Flatten work packages into Gantt tasks and links |
//! | `packages list` | Paginated work package listing |
//! | `packages show <id>` | One work package with its tasks and instances |
//! | `packages by-aircraft <id>` | All work packages of one aircraft |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `json` (default) - The chart payload, as served to the front end
//! - `text` - Human-readable tables
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output; `RUST_LOG` tunes the
//! library diagnostics further:
//! ```bash
//! station-gantt --verbose gantt --input work_packages.json
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod args;
mod gantt;
mod output;
mod packages;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
