use crate::{AnalysisRequest, Language, TaskKind};
use chrono::Utc;
use serde::Serialize;

/// One completed analysis, as tracked per session. The code itself is never
/// stored, only its length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub language: Language,
    pub task: TaskKind,
    pub code_length: usize,
}

impl HistoryEntry {
    /// Capture the request's metadata with the current UTC time (RFC 3339).
    pub fn for_request(request: &AnalysisRequest) -> HistoryEntry {
        HistoryEntry {
            timestamp: Utc::now().to_rfc3339(),
            language: request.language(),
            task: request.task(),
            code_length: request.code().chars().count(),
        }
    }
}

/// Append-only log of completed analyses, owned by the caller. Backends and
/// the validator never see it.
#[derive(Debug, Default)]
pub struct AnalysisLog {
    entries: Vec<HistoryEntry>,
}

impl AnalysisLog {
    pub fn new() -> AnalysisLog {
        AnalysisLog::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// The most recent `n` entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<HistoryEntry> {
        self.entries.iter().rev().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
