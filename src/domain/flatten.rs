//! Flattens work packages into Gantt tasks and links
//!
//! Filtering is top-down: a rejected work package takes its whole subtree
//! with it, and a rejected task takes its instances. Rejected nodes never
//! draw an id, so surviving ids stay dense in traversal order.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::clock::{Clock, SystemClock};
use super::gantt::{GanttLink, GanttResponse, GanttTask, ResponseDebug};
use super::id::{GanttId, IdAllocator, ParentRef};
use super::link::build_links;
use super::record::WorkPackageRecord;
use super::schedule::{RejectReason, ScheduleNode};
use super::walker::{HierarchyWalker, Level, Node};

/// A node left out of the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Which record, e.g. `task 3 of work package 7`
    pub key: String,
    pub reason: String,
    pub cause: RejectReason,
}

/// Counts for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenStats {
    pub total_work_packages: usize,
    pub emitted_tasks: usize,
    /// Work packages rejected (their subtrees are never visited)
    pub skipped: usize,
    pub rejected_tasks: usize,
    pub rejected_instances: usize,
    pub links: usize,
}

/// Result of a run
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenOutput {
    pub tasks: Vec<GanttTask>,
    pub links: Vec<GanttLink>,
    pub stats: FlattenStats,
    pub rejections: Vec<Rejection>,
}

impl FlattenOutput {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Converts to the wire shape, attaching `message` and `debug` when no
    /// task survived
    pub fn into_response(self, empty_message: &str) -> GanttResponse {
        if self.tasks.is_empty() {
            return GanttResponse {
                tasks: Vec::new(),
                links: Vec::new(),
                message: Some(empty_message.to_string()),
                debug: Some(ResponseDebug {
                    total_work_packages: self.stats.total_work_packages,
                    skipped: self.stats.skipped,
                }),
            };
        }

        GanttResponse {
            tasks: self.tasks,
            links: self.links,
            message: None,
            debug: None,
        }
    }
}

/// Flatten engine
///
/// Holds only the clock; every call to [`run`](Self::run) builds its own
/// allocator and buffers, so one `Flattener` can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct Flattener<C: Clock = SystemClock> {
    clock: C,
}

impl Flattener<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> Flattener<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Flattens `packages`, preserving input order
    pub fn run(&self, packages: &[WorkPackageRecord]) -> FlattenOutput {
        let mut run = Run::new(self.clock.now());
        run.stats.total_work_packages = packages.len();

        let mut walker = HierarchyWalker::new(packages);
        let mut package_id: Option<GanttId> = None;
        let mut task_id: Option<GanttId> = None;

        while let Some(visit) = walker.next() {
            let emitted = match visit.node {
                Node::WorkPackage(wp) => {
                    package_id = run.emit(wp, ParentRef::None);
                    package_id
                }
                Node::Task(task) => {
                    task_id = run.emit(task, ParentRef::from(package_id));
                    task_id
                }
                Node::Instance(instance) => run.emit(instance, ParentRef::from(task_id)),
            };

            if emitted.is_none() {
                walker.skip_children();
            }
        }

        run.finish()
    }
}

/// Mutable state of a single run
struct Run {
    now: DateTime<Utc>,
    ids: IdAllocator,
    tasks: Vec<GanttTask>,
    stats: FlattenStats,
    rejections: Vec<Rejection>,
}

impl Run {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            ids: IdAllocator::new(),
            tasks: Vec::new(),
            stats: FlattenStats::default(),
            rejections: Vec::new(),
        }
    }

    /// Resolves and emits one node, returning its id, or None if rejected
    fn emit<N: ScheduleNode>(&mut self, node: &N, parent: ParentRef) -> Option<GanttId> {
        let interval = match node.interval() {
            Ok(interval) => interval,
            Err(cause) => {
                self.reject(node.key(), cause);
                return None;
            }
        };

        let id = self.ids.allocate();
        self.tasks.push(GanttTask {
            id,
            text: node.text(),
            start: interval.start,
            end: interval.end,
            duration: Some(node.duration_hours(&interval)),
            progress: Some(node.progress(&interval, self.now)),
            kind: N::LEVEL.kind(),
            parent,
            open: node.open(),
        });

        Some(id)
    }

    fn reject(&mut self, key: String, cause: RejectReason) {
        debug!(record = %key, reason = %cause, "skipping record");

        match cause.level() {
            Level::WorkPackage => self.stats.skipped += 1,
            Level::Task => self.stats.rejected_tasks += 1,
            Level::Instance => self.stats.rejected_instances += 1,
        }

        self.rejections.push(Rejection {
            key,
            reason: cause.to_string(),
            cause,
        });
    }

    fn finish(mut self) -> FlattenOutput {
        let links = build_links(&self.tasks, &mut self.ids);

        self.stats.emitted_tasks = self.tasks.len();
        self.stats.links = links.len();

        info!(
            work_packages = self.stats.total_work_packages,
            tasks = self.stats.emitted_tasks,
            skipped = self.stats.skipped,
            links = self.stats.links,
            "flattened work packages into gantt tasks"
        );

        FlattenOutput {
            tasks: self.tasks,
            links,
            stats: self.stats,
            rejections: self.rejections,
        }
    }
}
