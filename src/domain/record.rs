//! Source records for the maintenance hierarchy
//!
//! Work packages own execution tasks, which own execution instances.
//! Records arrive already retrieved; nothing here talks to storage.
//!
//! Field names accept both camelCase and the document store's PascalCase
//! spelling (`SchedStartDateTime`, `Avexetask`, ...).

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Top-level unit of scheduled maintenance work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackageRecord {
    #[serde(alias = "AircraftWorkPackageId")]
    pub id: i64,

    #[serde(alias = "AircraftId")]
    pub aircraft_id: i64,

    #[serde(default, alias = "WorkPackageName")]
    pub name: String,

    #[serde(default, alias = "WoNumber")]
    pub wo_number: String,

    #[serde(default, alias = "SchedStartDateTime")]
    pub sched_start: Option<DateTime<Utc>>,

    #[serde(default, alias = "SchedEndDateTime")]
    pub sched_end: Option<DateTime<Utc>>,

    #[serde(default, alias = "LocationCode", skip_serializing_if = "Option::is_none")]
    pub location_code: Option<String>,

    #[serde(default, alias = "IsHistoric", skip_serializing_if = "Option::is_none")]
    pub is_historic: Option<bool>,

    #[serde(default, alias = "Avexetask")]
    pub tasks: ChildRecords<ExecutionTaskRecord>,
}

impl WorkPackageRecord {
    /// Creates a work package with no dates and no tasks
    pub fn new(id: i64, aircraft_id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            aircraft_id,
            name: name.into(),
            wo_number: String::new(),
            sched_start: None,
            sched_end: None,
            location_code: None,
            is_historic: None,
            tasks: ChildRecords::default(),
        }
    }

    /// Returns true if the package declared at least one task record,
    /// well-formed or not
    pub fn has_task_records(&self) -> bool {
        self.tasks.declared() > 0
    }
}

/// A scheduled sub-activity within a work package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionTaskRecord {
    #[serde(alias = "TaskSeq")]
    pub task_seq: i64,

    #[serde(alias = "AircraftWpId")]
    pub work_package_id: i64,

    #[serde(alias = "AircraftId")]
    pub aircraft_id: i64,

    #[serde(default, alias = "Description")]
    pub description: String,

    #[serde(default, alias = "PlannedStart")]
    pub planned_start: Option<DateTime<Utc>>,

    #[serde(default, alias = "PlannedFinish")]
    pub planned_finish: Option<DateTime<Utc>>,

    #[serde(default, alias = "EarliestStart")]
    pub earliest_start: Option<DateTime<Utc>>,

    #[serde(default, alias = "LatestFinish")]
    pub latest_finish: Option<DateTime<Utc>>,

    #[serde(default, alias = "ActualStart")]
    pub actual_start: Option<DateTime<Utc>>,

    #[serde(default, alias = "ActualFinish")]
    pub actual_finish: Option<DateTime<Utc>>,

    /// Explicit duration in hours
    #[serde(default, alias = "Duration")]
    pub duration: Option<i64>,

    #[serde(default, alias = "JtExecutionInstanceArray")]
    pub instances: ChildRecords<ExecutionInstanceRecord>,
}

impl ExecutionTaskRecord {
    /// Creates a task with no dates and no instances
    pub fn new(task_seq: i64, work_package_id: i64, aircraft_id: i64, description: impl Into<String>) -> Self {
        Self {
            task_seq,
            work_package_id,
            aircraft_id,
            description: description.into(),
            planned_start: None,
            planned_finish: None,
            earliest_start: None,
            latest_finish: None,
            actual_start: None,
            actual_finish: None,
            duration: None,
            instances: ChildRecords::default(),
        }
    }
}

/// A concrete scheduled occurrence of an execution task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionInstanceRecord {
    #[serde(alias = "ExecutionInstanceSeq")]
    pub seq: i64,

    #[serde(default, alias = "AllocatedStart")]
    pub allocated_start: Option<DateTime<Utc>>,

    #[serde(default, alias = "AllocatedFinish")]
    pub allocated_finish: Option<DateTime<Utc>>,
}

impl ExecutionInstanceRecord {
    /// Creates an instance with the given allocation
    pub fn new(seq: i64, allocated_start: Option<DateTime<Utc>>, allocated_finish: Option<DateTime<Utc>>) -> Self {
        Self {
            seq,
            allocated_start,
            allocated_finish,
        }
    }
}

/// Ordered child records with lenient deserialization
///
/// Each element deserializes on its own. Elements missing required fields
/// are dropped with a warning and counted in [`malformed`](Self::malformed)
/// instead of failing the enclosing record. `null` reads as empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildRecords<T> {
    records: Vec<T>,
    malformed: usize,
}

impl<T> ChildRecords<T> {
    /// Returns the well-formed records in stored order
    pub fn as_slice(&self) -> &[T] {
        &self.records
    }

    /// Iterates over the well-formed records
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    /// Returns the number of well-formed records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no well-formed records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of elements dropped as malformed
    pub fn malformed(&self) -> usize {
        self.malformed
    }

    /// Returns the number of elements the source declared
    pub fn declared(&self) -> usize {
        self.records.len() + self.malformed
    }

    /// Appends a record
    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }
}

impl<T> Default for ChildRecords<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            malformed: 0,
        }
    }
}

impl<T> From<Vec<T>> for ChildRecords<T> {
    fn from(records: Vec<T>) -> Self {
        Self {
            records,
            malformed: 0,
        }
    }
}

impl<T> FromIterator<T> for ChildRecords<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a, T> IntoIterator for &'a ChildRecords<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<T: Serialize> Serialize for ChildRecords<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.records.serialize(serializer)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ChildRecords<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;

        let mut children = ChildRecords::default();
        for (index, value) in raw.unwrap_or_default().into_iter().enumerate() {
            match serde_json::from_value::<T>(value) {
                Ok(record) => children.records.push(record),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping malformed nested record");
                    children.malformed += 1;
                }
            }
        }

        Ok(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_camel_case() {
        let json = r#"{
            "id": 7,
            "aircraftId": 3,
            "name": "Engine Check",
            "woNumber": "WO-1",
            "schedStart": "2024-03-01T08:00:00Z",
            "schedEnd": "2024-03-01T18:00:00Z",
            "tasks": [{
                "taskSeq": 1,
                "workPackageId": 7,
                "aircraftId": 3,
                "description": "Borescope",
                "duration": 4,
                "instances": [{"seq": 1, "allocatedStart": "2024-03-01T08:00:00Z"}]
            }]
        }"#;

        let wp: WorkPackageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(wp.id, 7);
        assert_eq!(wp.wo_number, "WO-1");
        assert_eq!(wp.sched_start, Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()));
        assert_eq!(wp.tasks.len(), 1);

        let task = &wp.tasks.as_slice()[0];
        assert_eq!(task.duration, Some(4));
        assert_eq!(task.instances.len(), 1);
        assert!(task.instances.as_slice()[0].allocated_finish.is_none());
    }

    #[test]
    fn parses_document_store_names() {
        let json = r#"{
            "AircraftWorkPackageId": 547,
            "AircraftId": 12,
            "WorkPackageName": "A-Check",
            "WoNumber": "",
            "SchedStartDateTime": "2024-03-01T08:00:00Z",
            "SchedEndDateTime": null,
            "LocationCode": "HAM",
            "IsHistoric": false,
            "Avexetask": [{
                "TaskSeq": 2,
                "AircraftWpId": 547,
                "AircraftId": 12,
                "Description": "Wheel change",
                "PlannedStart": "2024-03-01T09:00:00Z",
                "JtExecutionInstanceArray": null
            }]
        }"#;

        let wp: WorkPackageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(wp.id, 547);
        assert_eq!(wp.name, "A-Check");
        assert_eq!(wp.location_code.as_deref(), Some("HAM"));
        assert_eq!(wp.is_historic, Some(false));
        assert!(wp.sched_end.is_none());
        assert_eq!(wp.tasks.as_slice()[0].description, "Wheel change");
        assert!(wp.tasks.as_slice()[0].instances.is_empty());
    }

    #[test]
    fn optional_strings_default_to_empty() {
        let wp: WorkPackageRecord = serde_json::from_str(r#"{"id": 1, "aircraftId": 2}"#).unwrap();
        assert_eq!(wp.name, "");
        assert_eq!(wp.wo_number, "");
        assert!(!wp.has_task_records());
    }

    #[test]
    fn missing_required_field_fails_record() {
        let result = serde_json::from_str::<WorkPackageRecord>(r#"{"aircraftId": 2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn malformed_children_are_dropped_but_counted() {
        let json = r#"{
            "id": 1,
            "aircraftId": 2,
            "tasks": [
                {"description": "no sequence"},
                {"taskSeq": 3, "workPackageId": 1, "aircraftId": 2}
            ]
        }"#;

        let wp: WorkPackageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(wp.tasks.len(), 1);
        assert_eq!(wp.tasks.malformed(), 1);
        assert_eq!(wp.tasks.declared(), 2);
        assert_eq!(wp.tasks.as_slice()[0].task_seq, 3);
    }

    #[test]
    fn only_malformed_children_still_count_as_declared() {
        let json = r#"{"id": 1, "aircraftId": 2, "tasks": [{"bogus": true}]}"#;

        let wp: WorkPackageRecord = serde_json::from_str(json).unwrap();
        assert!(wp.tasks.is_empty());
        assert!(wp.has_task_records());
    }

    #[test]
    fn null_children_read_as_empty() {
        let wp: WorkPackageRecord =
            serde_json::from_str(r#"{"id": 1, "aircraftId": 2, "Avexetask": null}"#).unwrap();
        assert!(wp.tasks.is_empty());
        assert!(!wp.has_task_records());
    }

    #[test]
    fn serializes_children_as_plain_list() {
        let mut wp = WorkPackageRecord::new(1, 2, "Check");
        wp.tasks.push(ExecutionTaskRecord::new(1, 1, 2, "Inspect"));

        let value = serde_json::to_value(&wp).unwrap();
        assert_eq!(value["tasks"][0]["taskSeq"], 1);
        assert_eq!(value["aircraftId"], 2);
        assert!(value.get("locationCode").is_none());
    }
}
