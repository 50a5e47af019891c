use serde::Serialize;

use crate::data::models::definition_models::Definition;

/// A normalized dictionary entry ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRecord {
    pub term: String,
    pub source: String,
    pub radical: Option<String>,
    pub stroke_count: Option<i32>,
    pub non_radical_stroke_count: Option<i32>,
    pub pronunciations: Vec<PronunciationRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PronunciationRecord {
    pub bopomofo: Option<String>,
    pub pinyin: Option<String>,
    pub definitions: Vec<Definition>,
}

/// Where one dictionary dataset comes from and how much of the overall
/// progress bar it accounts for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceDescriptor {
    pub key: String,
    pub url: String,
    pub label: String,
    pub approx_record_count: usize,
    pub progress_weight: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SetupPhase {
    Pending,
    Running,
    Ready,
    Failed,
}

/// Latest known state of the first-run ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupStatus {
    pub phase: SetupPhase,
    pub progress: f32,
    pub message: String,
}

impl SetupStatus {
    pub fn pending() -> Self {
        SetupStatus {
            phase: SetupPhase::Pending,
            progress: 0.0,
            message: "Waiting to start".to_string(),
        }
    }

    pub fn running(progress: f32, message: impl Into<String>) -> Self {
        SetupStatus {
            phase: SetupPhase::Running,
            progress,
            message: message.into(),
        }
    }

    pub fn ready(message: impl Into<String>) -> Self {
        SetupStatus {
            phase: SetupPhase::Ready,
            progress: 1.0,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        SetupStatus {
            phase: SetupPhase::Failed,
            progress: 1.0,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// The store already held this many entries; nothing was fetched.
    Skipped { existing: i64 },
    Completed { inserted: usize },
    /// Every source failed or was empty; the store is still empty.
    NoRecords,
    Failed { message: String },
}
