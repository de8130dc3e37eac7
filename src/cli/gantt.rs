//! Gantt command: fetch work packages and flatten them into chart data

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;

use super::args::{parse_limit, FilterArgs, InputArgs};
use super::output::Output;
use crate::domain::{FixedClock, FlattenOutput, Flattener, GanttId, ParentRef};
use crate::storage::Config;

#[derive(Args, Debug)]
pub struct GanttArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Max work packages to flatten, 1-1000 (defaults to source.limit from config)
    #[arg(long, value_parser = parse_limit)]
    pub limit: Option<usize>,

    /// Reference time for progress of started tasks (RFC 3339, defaults to now)
    #[arg(long, value_parser = parse_timestamp)]
    pub now: Option<DateTime<Utc>>,
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{}': {}", s, e))
}

/// Flattens the selected work packages and prints the chart
pub fn run(args: GanttArgs, config: &Config, output: &Output) -> Result<()> {
    let source = args.input.open(config)?;
    output.verbose_ctx(
        "gantt",
        &format!(
            "Reading work packages from: {} ({:?})",
            source.path().display(),
            source.format()
        ),
    );

    let query = args
        .filters
        .query()
        .sorted(config.project.source.sort)
        .limit(args.limit.unwrap_or(config.project.source.limit));
    output.verbose_ctx("gantt", &format!("Query: {:?}", query));

    let fetched = source
        .fetch(&query)
        .context("Failed to retrieve work packages")?;
    output.verbose_ctx(
        "gantt",
        &format!(
            "Found {} work packages ({} matching, {} malformed)",
            fetched.records.len(),
            fetched.total,
            fetched.warnings.len()
        ),
    );

    let flattened = match args.now {
        Some(now) => Flattener::with_clock(FixedClock(now)).run(&fetched.records),
        None => Flattener::new().run(&fetched.records),
    };

    for rejection in &flattened.rejections {
        output.verbose_ctx("gantt", &format!("Skipped {}: {}", rejection.key, rejection.reason));
    }
    output.verbose_ctx(
        "gantt",
        &format!(
            "Transformed {} work packages into {} Gantt tasks (skipped {})",
            flattened.stats.total_work_packages,
            flattened.stats.emitted_tasks,
            flattened.stats.skipped
        ),
    );

    if output.is_json() {
        let response = flattened.into_response(&config.project.empty_message);
        output.data(&response)?;
    } else {
        print_chart(&flattened, &config.project.empty_message);
    }

    Ok(())
}

/// Prints tasks as an indented table followed by links
fn print_chart(flattened: &FlattenOutput, empty_message: &str) {
    if flattened.is_empty() {
        println!("{}", empty_message);
        println!(
            "Total work packages: {}, skipped: {}",
            flattened.stats.total_work_packages, flattened.stats.skipped
        );
        return;
    }

    let mut depth: HashMap<GanttId, usize> = HashMap::new();

    println!(
        "{:<6} {:<16} {:<16} {:>6} {:>4}  TEXT",
        "ID", "START", "END", "HOURS", "PCT"
    );
    println!("{}", "-".repeat(80));

    for task in &flattened.tasks {
        let level = match task.parent {
            ParentRef::None => 0,
            ParentRef::Task(parent) => depth.get(&parent).map_or(1, |d| d + 1),
        };
        depth.insert(task.id, level);

        println!(
            "{:<6} {:<16} {:<16} {:>6} {:>3}%  {}{}",
            task.id,
            task.start.format("%Y-%m-%d %H:%M"),
            task.end.format("%Y-%m-%d %H:%M"),
            task.duration.map(|d| d.to_string()).unwrap_or_default(),
            task.progress.unwrap_or(0),
            "  ".repeat(level),
            task.text
        );
    }

    if !flattened.links.is_empty() {
        println!();
        println!("Links ({}):", flattened.links.len());
        for link in &flattened.links {
            println!(
                "  {:<6} {} -> {} ({})",
                link.id,
                link.source,
                link.target,
                link.link_type.as_str()
            );
        }
    }

    println!();
    println!(
        "Flattened {} work packages into {} tasks and {} links (skipped {})",
        flattened.stats.total_work_packages,
        flattened.stats.emitted_tasks,
        flattened.stats.links,
        flattened.stats.skipped
    );
}
