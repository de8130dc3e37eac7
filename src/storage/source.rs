//! File-backed work package source
//!
//! Reads a JSON array (`.json`), JSON lines (`.jsonl`) or YAML sequence
//! (`.yaml`/`.yml`) of work package documents, holding a shared file lock
//! while reading.
//!
//! Every document decodes on its own: a malformed one becomes a
//! [`SourceWarning`] and the rest still load. Only failing to obtain the
//! collection at all is a [`SourceError`].

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::WorkPackageRecord;

/// Upper bound on work packages returned by one query
pub const MAX_LIMIT: usize = 1000;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Record source not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read record source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse record source {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Record source {0} does not contain a list of work packages")]
    NotACollection(PathBuf),

    #[error("Unsupported record source format '{0}': expected json, jsonl, yaml or yml")]
    UnsupportedFormat(String),
}

/// A document that could not be decoded and was skipped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record {position} skipped: {message}")]
pub struct SourceWarning {
    /// 1-based position in the collection (line number for JSON lines)
    pub position: usize,
    pub message: String,
}

/// On-disk encoding of a record source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    JsonLines,
    Yaml,
}

impl RecordFormat {
    /// Picks the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match ext.as_str() {
            "json" => Ok(RecordFormat::Json),
            "jsonl" | "ndjson" => Ok(RecordFormat::JsonLines),
            "yaml" | "yml" => Ok(RecordFormat::Yaml),
            _ => Err(SourceError::UnsupportedFormat(ext)),
        }
    }
}

/// Ordering applied before paging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Earliest scheduled start first; packages without one come first
    #[default]
    SchedStartAsc,
    /// Latest scheduled start first; packages without one come last
    SchedStartDesc,
    /// Keep file order
    FileOrder,
}

/// Filter, sort and page settings for a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub aircraft_id: Option<i64>,
    pub work_package_id: Option<i64>,
    pub location_code: Option<String>,
    pub is_historic: Option<bool>,
    pub sort: SortOrder,
    page: usize,
    limit: usize,
    paged: bool,
}

impl Default for RecordQuery {
    fn default() -> Self {
        Self {
            aircraft_id: None,
            work_package_id: None,
            location_code: None,
            is_historic: None,
            sort: SortOrder::default(),
            page: 1,
            limit: MAX_LIMIT,
            paged: true,
        }
    }
}

impl RecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aircraft(mut self, aircraft_id: Option<i64>) -> Self {
        self.aircraft_id = aircraft_id;
        self
    }

    pub fn work_package(mut self, work_package_id: Option<i64>) -> Self {
        self.work_package_id = work_package_id;
        self
    }

    pub fn location(mut self, location_code: Option<String>) -> Self {
        self.location_code = location_code;
        self
    }

    pub fn historic(mut self, is_historic: Option<bool>) -> Self {
        self.is_historic = is_historic;
        self
    }

    pub fn sorted(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the 1-based page; 0 is treated as 1
    pub fn page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self.paged = true;
        self
    }

    /// Sets the page size, clamped to `1..=MAX_LIMIT`
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit.clamp(1, MAX_LIMIT);
        self.paged = true;
        self
    }

    /// Returns every matching record, ignoring page and limit
    pub fn unpaged(mut self) -> Self {
        self.paged = false;
        self
    }

    pub fn page_number(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.limit
    }

    fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Returns true if the record passes every filter
    pub fn matches(&self, wp: &WorkPackageRecord) -> bool {
        if self.aircraft_id.is_some_and(|id| id != wp.aircraft_id) {
            return false;
        }
        if self.work_package_id.is_some_and(|id| id != wp.id) {
            return false;
        }
        if let Some(code) = &self.location_code {
            if wp.location_code.as_deref() != Some(code.as_str()) {
                return false;
            }
        }
        if let Some(historic) = self.is_historic {
            if wp.is_historic != Some(historic) {
                return false;
            }
        }
        true
    }
}

/// Records returned by a fetch
#[derive(Debug, Clone, Default)]
pub struct Fetched {
    pub records: Vec<WorkPackageRecord>,
    /// Matching records before paging
    pub total: usize,
    pub warnings: Vec<SourceWarning>,
}

/// Work package source backed by a single file
pub struct RecordSource {
    path: PathBuf,
    format: RecordFormat,
}

impl RecordSource {
    /// Opens a source, inferring the format from the extension
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let path = path.into();
        let format = RecordFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    /// Returns the path to the source file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> RecordFormat {
        self.format
    }

    /// Reads every well-formed record in file order
    pub fn load(&self) -> Result<(Vec<WorkPackageRecord>, Vec<SourceWarning>), SourceError> {
        let content = self.read_locked()?;
        let (documents, mut warnings) = self.split_documents(&content)?;

        let mut records = Vec::with_capacity(documents.len());
        for (position, document) in documents {
            match serde_json::from_value::<WorkPackageRecord>(document) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(position, error = %e, "skipping malformed work package");
                    warnings.push(SourceWarning {
                        position,
                        message: e.to_string(),
                    });
                }
            }
        }

        debug!(
            path = %self.path.display(),
            records = records.len(),
            skipped = warnings.len(),
            "loaded work packages"
        );

        Ok((records, warnings))
    }

    /// Filters, sorts and pages the records
    pub fn fetch(&self, query: &RecordQuery) -> Result<Fetched, SourceError> {
        let (records, warnings) = self.load()?;

        let mut matching: Vec<_> = records.into_iter().filter(|wp| query.matches(wp)).collect();
        sort_records(&mut matching, query.sort);

        let total = matching.len();
        let records = if query.paged {
            matching
                .into_iter()
                .skip(query.offset())
                .take(query.page_size())
                .collect()
        } else {
            matching
        };

        Ok(Fetched {
            records,
            total,
            warnings,
        })
    }

    /// Finds a work package by its id
    pub fn find_by_id(&self, id: i64) -> Result<Option<WorkPackageRecord>, SourceError> {
        let (records, _) = self.load()?;
        Ok(records.into_iter().find(|wp| wp.id == id))
    }

    fn io_error(&self, source: std::io::Error) -> SourceError {
        SourceError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn parse_error(&self, message: impl ToString) -> SourceError {
        SourceError::Parse {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }

    fn read_locked(&self) -> Result<String, SourceError> {
        if !self.path.exists() {
            return Err(SourceError::NotFound(self.path.clone()));
        }

        let mut file = File::open(&self.path).map_err(|e| self.io_error(e))?;

        // Released when the file is dropped
        FileExt::lock_shared(&file).map_err(|e| self.io_error(e))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| self.io_error(e))?;

        Ok(content)
    }

    /// Splits the file into one JSON value per document, numbered from 1
    fn split_documents(
        &self,
        content: &str,
    ) -> Result<(Vec<(usize, serde_json::Value)>, Vec<SourceWarning>), SourceError> {
        if content.trim().is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }

        let collection = match self.format {
            RecordFormat::JsonLines => return Ok(split_lines(content)),
            RecordFormat::Json => {
                serde_json::from_str::<serde_json::Value>(content).map_err(|e| self.parse_error(e))?
            }
            RecordFormat::Yaml => {
                serde_yaml::from_str::<serde_json::Value>(content).map_err(|e| self.parse_error(e))?
            }
        };

        match collection {
            serde_json::Value::Array(items) => Ok((
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (i + 1, v))
                    .collect(),
                Vec::new(),
            )),
            _ => Err(SourceError::NotACollection(self.path.clone())),
        }
    }
}

fn split_lines(content: &str) -> (Vec<(usize, serde_json::Value)>, Vec<SourceWarning>) {
    let mut documents = Vec::new();
    let mut warnings = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_num = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str(line) {
            Ok(value) => documents.push((line_num, value)),
            Err(e) => {
                warn!(line = line_num, error = %e, "skipping unparsable line");
                warnings.push(SourceWarning {
                    position: line_num,
                    message: e.to_string(),
                });
            }
        }
    }

    (documents, warnings)
}

/// Orders by scheduled start; a missing start sorts before any date
fn sort_records(records: &mut [WorkPackageRecord], order: SortOrder) {
    match order {
        SortOrder::SchedStartAsc => records.sort_by(|a, b| a.sched_start.cmp(&b.sched_start)),
        SortOrder::SchedStartDesc => records.sort_by(|a, b| b.sched_start.cmp(&a.sched_start)),
        SortOrder::FileOrder => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PACKAGES: &str = r#"[
        {"id": 1, "aircraftId": 10, "name": "B", "schedStart": "2024-03-02T00:00:00Z", "locationCode": "HAM", "isHistoric": false},
        {"id": 2, "aircraftId": 20, "name": "A", "schedStart": "2024-03-01T00:00:00Z", "locationCode": "FRA"},
        {"id": 3, "aircraftId": 10, "name": "C", "locationCode": "HAM", "isHistoric": true}
    ]"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> RecordSource {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        RecordSource::open(path).unwrap()
    }

    fn ids(records: &[WorkPackageRecord]) -> Vec<i64> {
        records.iter().map(|wp| wp.id).collect()
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(RecordFormat::from_path(Path::new("a.json")).unwrap(), RecordFormat::Json);
        assert_eq!(RecordFormat::from_path(Path::new("a.JSONL")).unwrap(), RecordFormat::JsonLines);
        assert_eq!(RecordFormat::from_path(Path::new("a.yml")).unwrap(), RecordFormat::Yaml);
        assert!(matches!(
            RecordFormat::from_path(Path::new("a.csv")),
            Err(SourceError::UnsupportedFormat(ext)) if ext == "csv"
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let source = RecordSource::open(dir.path().join("absent.json")).unwrap();

        assert!(matches!(source.load(), Err(SourceError::NotFound(_))));
    }

    #[test]
    fn empty_file_is_an_empty_collection() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "wp.json", "  \n");

        let (records, warnings) = source.load().unwrap();
        assert!(records.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn object_instead_of_list_is_an_error() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "wp.json", r#"{"id": 1}"#);

        assert!(matches!(source.load(), Err(SourceError::NotACollection(_))));
    }

    #[test]
    fn broken_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "wp.json", "[{");

        assert!(matches!(source.load(), Err(SourceError::Parse { .. })));
    }

    #[test]
    fn malformed_records_are_skipped_with_warning() {
        let dir = TempDir::new().unwrap();
        let source = write(
            &dir,
            "wp.json",
            r#"[{"id": 1, "aircraftId": 2}, {"name": "no ids"}, {"id": 3, "aircraftId": 2}]"#,
        );

        let (records, warnings) = source.load().unwrap();
        assert_eq!(ids(&records), vec![1, 3]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].position, 2);
    }

    #[test]
    fn reads_json_lines() {
        let dir = TempDir::new().unwrap();
        let source = write(
            &dir,
            "wp.jsonl",
            "{\"id\": 1, \"aircraftId\": 2}\n\nnot json\n{\"id\": 2, \"aircraftId\": 2}\n",
        );

        let (records, warnings) = source.load().unwrap();
        assert_eq!(ids(&records), vec![1, 2]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].position, 3);
    }

    #[test]
    fn reads_yaml() {
        let dir = TempDir::new().unwrap();
        let source = write(
            &dir,
            "wp.yaml",
            r#"
- id: 5
  aircraftId: 9
  name: Cabin refit
  schedStart: "2024-03-01T08:00:00Z"
  schedEnd: "2024-03-02T08:00:00Z"
  tasks:
    - taskSeq: 1
      workPackageId: 5
      aircraftId: 9
      description: Seats
"#,
        );

        let (records, _) = source.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Cabin refit");
        assert_eq!(records[0].tasks.len(), 1);
        assert!(records[0].sched_end.is_some());
    }

    #[test]
    fn fetch_sorts_by_scheduled_start() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "wp.json", PACKAGES);

        let asc = source.fetch(&RecordQuery::new()).unwrap();
        assert_eq!(ids(&asc.records), vec![3, 2, 1]);

        let desc = source
            .fetch(&RecordQuery::new().sorted(SortOrder::SchedStartDesc))
            .unwrap();
        assert_eq!(ids(&desc.records), vec![1, 2, 3]);

        let unsorted = source.fetch(&RecordQuery::new().sorted(SortOrder::FileOrder)).unwrap();
        assert_eq!(ids(&unsorted.records), vec![1, 2, 3]);
    }

    #[test]
    fn fetch_applies_filters() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "wp.json", PACKAGES);

        let by_aircraft = source.fetch(&RecordQuery::new().aircraft(Some(10))).unwrap();
        assert_eq!(by_aircraft.total, 2);

        let by_location = source
            .fetch(&RecordQuery::new().location(Some("FRA".to_string())))
            .unwrap();
        assert_eq!(ids(&by_location.records), vec![2]);

        let historic = source.fetch(&RecordQuery::new().historic(Some(true))).unwrap();
        assert_eq!(ids(&historic.records), vec![3]);

        let current = source.fetch(&RecordQuery::new().historic(Some(false))).unwrap();
        assert_eq!(ids(&current.records), vec![1]);

        let by_id = source.fetch(&RecordQuery::new().work_package(Some(2))).unwrap();
        assert_eq!(ids(&by_id.records), vec![2]);
    }

    #[test]
    fn fetch_pages_after_sorting() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "wp.json", PACKAGES);

        let query = RecordQuery::new().sorted(SortOrder::FileOrder).limit(2).page(2);
        let page = source.fetch(&query).unwrap();

        assert_eq!(ids(&page.records), vec![3]);
        assert_eq!(page.total, 3);
    }

    #[test]
    fn query_bounds() {
        let query = RecordQuery::new().limit(5000).page(0);
        assert_eq!(query.page_size(), MAX_LIMIT);
        assert_eq!(query.page_number(), 1);

        assert_eq!(RecordQuery::new().limit(0).page_size(), 1);
    }

    #[test]
    fn unpaged_fetch_returns_every_match() {
        let dir = TempDir::new().unwrap();
        let documents: Vec<String> = (1..=MAX_LIMIT + 5)
            .map(|id| format!(r#"{{"id": {}, "aircraftId": 3}}"#, id))
            .collect();
        let source = write(&dir, "wp.json", &format!("[{}]", documents.join(",")));

        let paged = source.fetch(&RecordQuery::new().aircraft(Some(3))).unwrap();
        assert_eq!(paged.records.len(), MAX_LIMIT);
        assert_eq!(paged.total, MAX_LIMIT + 5);

        let query = RecordQuery::new().aircraft(Some(3)).unpaged();
        let all = source.fetch(&query).unwrap();
        assert_eq!(all.records.len(), MAX_LIMIT + 5);
        assert_eq!(all.total, MAX_LIMIT + 5);

        let repaged = source.fetch(&query.limit(10)).unwrap();
        assert_eq!(repaged.records.len(), 10);
    }

    #[test]
    fn find_by_id() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "wp.json", PACKAGES);

        assert_eq!(source.find_by_id(2).unwrap().map(|wp| wp.name), Some("A".to_string()));
        assert!(source.find_by_id(42).unwrap().is_none());
    }
}
