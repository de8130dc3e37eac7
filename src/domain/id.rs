//! Gantt identifiers and the per-run id allocator
//!
//! Ids are process-local integers handed out in emission order:
//! - Tasks and links share one counter per run, starting at 1
//! - A parent reference is either absent or the id of an emitted task
//!
//! Ids carry no identity across runs; the same input flattened twice
//! yields the same ids only because traversal order is deterministic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Id of an emitted Gantt task or link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GanttId(u64);

impl GanttId {
    /// Returns the raw integer value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GanttId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<GanttId> for u64 {
    fn from(id: GanttId) -> Self {
        id.0
    }
}

/// Parent of an emitted task
///
/// Serialized as the parent's integer id, or `null` for top-level tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<GanttId>", into = "Option<GanttId>")]
pub enum ParentRef {
    #[default]
    None,
    Task(GanttId),
}

impl ParentRef {
    /// Returns true for top-level tasks
    pub fn is_none(&self) -> bool {
        matches!(self, ParentRef::None)
    }

    /// Returns the parent id, if any
    pub fn id(&self) -> Option<GanttId> {
        match self {
            ParentRef::None => None,
            ParentRef::Task(id) => Some(*id),
        }
    }
}

impl From<Option<GanttId>> for ParentRef {
    fn from(id: Option<GanttId>) -> Self {
        match id {
            Some(id) => ParentRef::Task(id),
            None => ParentRef::None,
        }
    }
}

impl From<ParentRef> for Option<GanttId> {
    fn from(parent: ParentRef) -> Self {
        parent.id()
    }
}

/// Monotonic id counter owned by a single flatten run
///
/// Not `Clone`; a sequence has exactly one owner.
#[derive(Debug)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Creates an allocator whose first id is 1
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Draws the next id
    pub fn allocate(&mut self) -> GanttId {
        let id = GanttId(self.next);
        self.next += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
