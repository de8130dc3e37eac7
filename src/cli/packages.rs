//! Work package inspection commands (list, show, by-aircraft)

use anyhow::{Context, Result};
use clap::Subcommand;

use super::args::{parse_limit, FilterArgs, InputArgs};
use super::output::Output;
use crate::domain::WorkPackageRecord;
use crate::storage::{Config, RecordQuery, SortOrder};

#[derive(Subcommand, Debug)]
pub enum PackageCommands {
    /// List work packages, newest scheduled start first
    List {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Work packages per page (1-1000)
        #[arg(long, default_value = "100", value_parser = parse_limit)]
        limit: usize,
    },

    /// Show a work package with its tasks and instances
    Show {
        /// Work package id
        id: i64,

        #[command(flatten)]
        input: InputArgs,
    },

    /// List every work package of one aircraft, newest scheduled start first
    ByAircraft {
        /// Aircraft id
        aircraft_id: i64,

        #[command(flatten)]
        input: InputArgs,
    },
}

pub fn run(cmd: PackageCommands, config: &Config, output: &Output) -> Result<()> {
    match cmd {
        PackageCommands::List {
            input,
            filters,
            page,
            limit,
        } => list(config, output, &input, &filters, page, limit),
        PackageCommands::Show { id, input } => show(config, output, &input, id),
        PackageCommands::ByAircraft { aircraft_id, input } => {
            by_aircraft(config, output, &input, aircraft_id)
        }
    }
}

fn list(
    config: &Config,
    output: &Output,
    input: &InputArgs,
    filters: &FilterArgs,
    page: usize,
    limit: usize,
) -> Result<()> {
    let source = input.open(config)?;
    let query = filters
        .query()
        .sorted(SortOrder::SchedStartDesc)
        .page(page)
        .limit(limit);
    output.verbose_ctx("list", &format!("Query: {:?}", query));

    let fetched = source
        .fetch(&query)
        .context("Failed to retrieve work packages")?;

    let page_size = query.page_size();
    let total_pages = fetched.total.div_ceil(page_size);

    if output.is_json() {
        output.data(&serde_json::json!({
            "data": fetched.records,
            "total": fetched.total,
            "page": query.page_number(),
            "limit": page_size,
            "totalPages": total_pages,
        }))?;
    } else if fetched.records.is_empty() {
        println!("No work packages found.");
    } else {
        print_table(&fetched.records);
        println!();
        println!(
            "Page {} of {} ({} work packages)",
            query.page_number(),
            total_pages,
            fetched.total
        );
    }

    Ok(())
}

fn show(config: &Config, output: &Output, input: &InputArgs, id: i64) -> Result<()> {
    let source = input.open(config)?;
    output.verbose_ctx("show", &format!("Looking up work package {}", id));

    let wp = source
        .find_by_id(id)
        .context("Failed to retrieve work packages")?
        .ok_or_else(|| anyhow::anyhow!("Work package not found: {}", id))?;

    if output.is_json() {
        output.data(&wp)?;
        return Ok(());
    }

    println!("{} (WP:{}, AC:{})", wp.name, wp.id, wp.aircraft_id);
    if !wp.wo_number.is_empty() {
        println!("  Work order: {}", wp.wo_number);
    }
    if let Some(code) = &wp.location_code {
        println!("  Location:   {}", code);
    }
    println!("  Scheduled:  {} -> {}", fmt_date(&wp.sched_start), fmt_date(&wp.sched_end));

    if wp.tasks.is_empty() {
        println!("  No tasks.");
    }
    for task in &wp.tasks {
        println!();
        println!("  [Seq:{}] {}", task.task_seq, task.description);
        println!(
            "    Planned:  {} -> {}",
            fmt_date(&task.planned_start),
            fmt_date(&task.planned_finish)
        );
        println!(
            "    Window:   {} -> {}",
            fmt_date(&task.earliest_start),
            fmt_date(&task.latest_finish)
        );
        println!(
            "    Actual:   {} -> {}",
            fmt_date(&task.actual_start),
            fmt_date(&task.actual_finish)
        );
        for instance in &task.instances {
            println!(
                "    Instance {}: {} -> {}",
                instance.seq,
                fmt_date(&instance.allocated_start),
                fmt_date(&instance.allocated_finish)
            );
        }
    }
    if wp.tasks.malformed() > 0 {
        println!();
        println!("  ({} malformed task records skipped)", wp.tasks.malformed());
    }

    Ok(())
}

fn by_aircraft(config: &Config, output: &Output, input: &InputArgs, aircraft_id: i64) -> Result<()> {
    let source = input.open(config)?;
    let query = RecordQuery::new()
        .aircraft(Some(aircraft_id))
        .sorted(SortOrder::SchedStartDesc)
        .unpaged();

    let fetched = source
        .fetch(&query)
        .context("Failed to retrieve work packages")?;
    output.verbose_ctx(
        "by-aircraft",
        &format!("Found {} work packages for aircraft {}", fetched.records.len(), aircraft_id),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "data": fetched.records,
            "count": fetched.total,
        }))?;
    } else if fetched.records.is_empty() {
        println!("No work packages for aircraft {}.", aircraft_id);
    } else {
        print_table(&fetched.records);
    }

    Ok(())
}

fn print_table(records: &[WorkPackageRecord]) {
    println!(
        "{:<8} {:<10} {:<16} {:<16} {:>5}  NAME",
        "ID", "AIRCRAFT", "SCHED START", "SCHED END", "TASKS"
    );
    println!("{}", "-".repeat(80));
    for wp in records {
        println!(
            "{:<8} {:<10} {:<16} {:<16} {:>5}  {}",
            wp.id,
            wp.aircraft_id,
            fmt_date(&wp.sched_start),
            fmt_date(&wp.sched_end),
            wp.tasks.len(),
            wp.name
        );
    }
}

fn fmt_date(date: &Option<chrono::DateTime<chrono::Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
