//! station-gantt - Gantt chart data for aircraft maintenance schedules
//!
//! Flattens the work package → execution task → execution instance
//! hierarchy into the flat task and link lists a Gantt chart renders.
//! The engine in [`domain`] is a pure transform; [`storage`] supplies
//! records and configuration, and [`cli`] wires both to the terminal.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{
    ExecutionInstanceRecord, ExecutionTaskRecord, FlattenOutput, Flattener, GanttLink,
    GanttResponse, GanttTask, WorkPackageRecord,
};
