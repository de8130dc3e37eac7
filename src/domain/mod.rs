//! Domain models for station-gantt
//!
//! Contains the flattening engine and its data types without any I/O
//! concerns.

mod id;
mod record;
mod gantt;
mod walker;
mod label;
mod schedule;
mod link;
mod clock;
mod flatten;

pub use id::{GanttId, IdAllocator, ParentRef};
pub use record::{ChildRecords, ExecutionInstanceRecord, ExecutionTaskRecord, WorkPackageRecord};
pub use gantt::{GanttLink, GanttResponse, GanttTask, LinkType, ResponseDebug, TaskKind};
pub use walker::{HierarchyWalker, Level, Node, NodePath, Visit};
pub use label::{instance_text, task_text, work_package_text};
pub use schedule::{progress_percent, Actuals, Interval, RejectReason, ScheduleNode};
pub use link::build_links;
pub use clock::{Clock, FixedClock, SystemClock};
pub use flatten::{FlattenOutput, FlattenStats, Flattener, Rejection};
