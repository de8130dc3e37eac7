//! Date resolution, duration and progress
//!
//! Each level resolves its own interval from its own fields; a task never
//! borrows its work package's dates. The per-level rules live in the
//! [`ScheduleNode`] impls so the flatten engine runs one code path for
//! all three levels.

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

use super::label;
use super::record::{ExecutionInstanceRecord, ExecutionTaskRecord, WorkPackageRecord};
use super::walker::Level;

/// Why a node was left out of the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("{0} has no resolvable start date")]
    MissingStart(Level),

    #[error("{0} has no resolvable end date")]
    MissingEnd(Level),

    #[error("{0} has no resolvable start or end date")]
    MissingDates(Level),
}

impl RejectReason {
    pub fn level(&self) -> Level {
        match self {
            RejectReason::MissingStart(level)
            | RejectReason::MissingEnd(level)
            | RejectReason::MissingDates(level) => *level,
        }
    }
}

/// Effective start and end of a node
///
/// No ordering is enforced: `end` may precede `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Picks the first present candidate for each bound
    pub fn resolve(
        level: Level,
        starts: &[Option<DateTime<Utc>>],
        ends: &[Option<DateTime<Utc>>],
    ) -> Result<Self, RejectReason> {
        let start = starts.iter().find_map(|candidate| *candidate);
        let end = ends.iter().find_map(|candidate| *candidate);

        match (start, end) {
            (Some(start), Some(end)) => Ok(Self { start, end }),
            (None, Some(_)) => Err(RejectReason::MissingStart(level)),
            (Some(_), None) => Err(RejectReason::MissingEnd(level)),
            (None, None) => Err(RejectReason::MissingDates(level)),
        }
    }

    pub fn length(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whole hours from start to end, truncated toward zero
    pub fn hours(&self) -> i64 {
        self.length().num_hours()
    }
}

/// Recorded execution dates of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Actuals {
    pub start: Option<DateTime<Utc>>,
    pub finish: Option<DateTime<Utc>>,
}

/// Percent complete of `scheduled`, clamped to 0-100
///
/// Elapsed time is `finish - start` when both actuals exist, `now - start`
/// when only the start exists, and nothing otherwise (progress 0). A
/// non-positive scheduled interval also yields 0.
pub fn progress_percent(scheduled: &Interval, actuals: &Actuals, now: DateTime<Utc>) -> u8 {
    let elapsed = match (actuals.start, actuals.finish) {
        (Some(start), Some(finish)) => finish - start,
        (Some(start), None) => now - start,
        _ => return 0,
    };

    let scheduled_ms = scheduled.length().num_milliseconds();
    if scheduled_ms <= 0 {
        return 0;
    }

    let ratio = elapsed.num_milliseconds() as f64 / scheduled_ms as f64;
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Per-level emission rules
pub trait ScheduleNode {
    const LEVEL: Level;

    /// Resolves the node's interval from its own date fields
    fn interval(&self) -> Result<Interval, RejectReason>;

    /// Display label
    fn text(&self) -> String;

    /// Short identification for diagnostics
    fn key(&self) -> String;

    /// Duration that overrides the date-derived one
    fn explicit_duration(&self) -> Option<i64> {
        None
    }

    /// Actual dates feeding progress; None means progress is fixed at 0
    fn actuals(&self) -> Option<Actuals> {
        None
    }

    /// Expanded flag for summary nodes
    fn open(&self) -> Option<bool> {
        None
    }

    fn duration_hours(&self, interval: &Interval) -> i64 {
        self.explicit_duration().unwrap_or_else(|| interval.hours())
    }

    fn progress(&self, interval: &Interval, now: DateTime<Utc>) -> u8 {
        self.actuals()
            .map_or(0, |actuals| progress_percent(interval, &actuals, now))
    }
}

impl ScheduleNode for WorkPackageRecord {
    const LEVEL: Level = Level::WorkPackage;

    fn interval(&self) -> Result<Interval, RejectReason> {
        Interval::resolve(Self::LEVEL, &[self.sched_start], &[self.sched_end])
    }

    fn text(&self) -> String {
        label::work_package_text(self)
    }

    fn key(&self) -> String {
        format!("work package {}", self.id)
    }

    fn open(&self) -> Option<bool> {
        Some(self.has_task_records())
    }
}

impl ScheduleNode for ExecutionTaskRecord {
    const LEVEL: Level = Level::Task;

    fn interval(&self) -> Result<Interval, RejectReason> {
        Interval::resolve(
            Self::LEVEL,
            &[self.planned_start, self.earliest_start],
            &[self.planned_finish, self.latest_finish],
        )
    }

    fn text(&self) -> String {
        label::task_text(self)
    }

    fn key(&self) -> String {
        format!("task {} of work package {}", self.task_seq, self.work_package_id)
    }

    fn explicit_duration(&self) -> Option<i64> {
        self.duration
    }

    fn actuals(&self) -> Option<Actuals> {
        Some(Actuals {
            start: self.actual_start,
            finish: self.actual_finish,
        })
    }
}

impl ScheduleNode for ExecutionInstanceRecord {
    const LEVEL: Level = Level::Instance;

    fn interval(&self) -> Result<Interval, RejectReason> {
        Interval::resolve(Self::LEVEL, &[self.allocated_start], &[self.allocated_finish])
    }

    fn text(&self) -> String {
        label::instance_text(self)
    }

    fn key(&self) -> String {
        format!("instance {}", self.seq)
    }
}
