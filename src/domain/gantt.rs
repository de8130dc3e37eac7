//! Gantt chart output model
//!
//! The JSON shape matches what the chart front end consumes:
//! `{ "tasks": [...], "links": [...] }`, with absent optional fields left
//! out rather than sent as `null`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{GanttId, ParentRef};

/// Kind of Gantt node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Aggregate node (a work package)
    Summary,
    /// Leaf or intermediate work item
    Task,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Summary => "summary",
            TaskKind::Task => "task",
        }
    }
}

/// A flat, rendering-ready Gantt task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttTask {
    pub id: GanttId,
    pub text: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,

    /// Hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,

    /// Percent complete, 0-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,

    #[serde(rename = "type")]
    pub kind: TaskKind,

    #[serde(default, skip_serializing_if = "ParentRef::is_none")]
    pub parent: ParentRef,

    /// Expanded state; only set on summary tasks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<bool>,
}

impl GanttTask {
    pub fn is_summary(&self) -> bool {
        self.kind == TaskKind::Summary
    }
}

/// Dependency type between two tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    /// End-to-start: target starts after source ends
    #[serde(rename = "e2s")]
    EndToStart,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::EndToStart => "e2s",
        }
    }
}

/// A dependency link between two Gantt tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GanttLink {
    pub id: GanttId,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    pub source: GanttId,
    pub target: GanttId,
}

/// Counts reported when a run produced no tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDebug {
    pub total_work_packages: usize,
    pub skipped: usize,
}

/// Serialized result of a flatten run
///
/// `message` and `debug` are only present when no task survived, so a
/// client can always read `tasks` and `links` without special cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttResponse {
    pub tasks: Vec<GanttTask>,
    pub links: Vec<GanttLink>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<ResponseDebug>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IdAllocator;
    use chrono::TimeZone;

    fn summary(ids: &mut IdAllocator) -> GanttTask {
        GanttTask {
            id: ids.allocate(),
            text: "Engine Check [WP:7, AC:3]".to_string(),
            start: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap(),
            duration: Some(10),
            progress: Some(0),
            kind: TaskKind::Summary,
            parent: ParentRef::None,
            open: Some(false),
        }
    }

    #[test]
    fn task_json_shape() {
        let mut ids = IdAllocator::new();
        let task = summary(&mut ids);

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["type"], "summary");
        assert_eq!(value["start"], "2024-03-01T08:00:00Z");
        assert_eq!(value["duration"], 10);
        assert_eq!(value["open"], false);
        assert!(value.get("parent").is_none());
    }

    #[test]
    fn child_task_omits_open_and_carries_parent() {
        let mut ids = IdAllocator::new();
        let parent = summary(&mut ids);
        let child = GanttTask {
            id: ids.allocate(),
            kind: TaskKind::Task,
            parent: ParentRef::Task(parent.id),
            open: None,
            ..parent.clone()
        };

        let value = serde_json::to_value(&child).unwrap();
        assert_eq!(value["type"], "task");
        assert_eq!(value["parent"], 1);
        assert!(value.get("open").is_none());
    }

    #[test]
    fn link_json_shape() {
        let mut ids = IdAllocator::new();
        let source = ids.allocate();
        let target = ids.allocate();
        let link = GanttLink {
            id: ids.allocate(),
            link_type: LinkType::EndToStart,
            source,
            target,
        };

        let value = serde_json::to_value(&link).unwrap();
        assert_eq!(value, serde_json::json!({"id": 3, "type": "e2s", "source": 1, "target": 2}));
    }

    #[test]
    fn response_omits_diagnostics_when_absent() {
        let response = GanttResponse {
            tasks: vec![],
            links: vec![],
            message: None,
            debug: None,
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, serde_json::json!({"tasks": [], "links": []}));
    }

    #[test]
    fn response_debug_uses_camel_case() {
        let response = GanttResponse {
            tasks: vec![],
            links: vec![],
            message: Some("nothing".to_string()),
            debug: Some(ResponseDebug {
                total_work_packages: 2,
                skipped: 2,
            }),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["debug"]["totalWorkPackages"], 2);
        assert_eq!(value["debug"]["skipped"], 2);
        assert_eq!(value["message"], "nothing");
    }
}
