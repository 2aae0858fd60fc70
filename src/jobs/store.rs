use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Draft,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Externally visible state of one generation job.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: u64,
    pub status: JobStatus,
    pub style: String,
    pub title: Option<String>,
    /// Set only when `status` is `Completed`.
    pub artifact_url: Option<String>,
}

impl JobRecord {
    pub fn draft(id: u64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// Job records keyed by id. Updates are read-modify-write; concurrent writers to one id race and
/// the last `put` wins.
pub trait JobStore: Send + Sync {
    fn get(&self, id: u64) -> Option<JobRecord>;
    fn put(&self, record: JobRecord);
}

#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    records: Mutex<HashMap<u64, JobRecord>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, JobRecord>> {
        // Records are replaced whole; a poisoned map never holds a half-written one.
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl JobStore for InMemoryJobStore {
    fn get(&self, id: u64) -> Option<JobRecord> {
        self.lock().get(&id).cloned()
    }

    fn put(&self, record: JobRecord) {
        self.lock().insert(record.id, record);
    }
}
