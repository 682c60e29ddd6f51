use crate::history::{AnalysisLog, HistoryEntry};
use crate::reviewer::{AnalysisError, AnalysisResult, CodeReviewer};
use crate::AnalysisRequest;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("an analysis is already in flight")]
    Busy,
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Owns one reviewer and the analysis log, and enforces the one-at-a-time
/// rule: a second `analyze` while one is outstanding is rejected without
/// touching the backend. Completed results are returned to the caller; the
/// session keeps no result state, only history metadata.
pub struct Session {
    reviewer: Arc<dyn CodeReviewer>,
    in_flight: AtomicBool,
    log: Mutex<AnalysisLog>,
}

impl Session {
    pub fn new(reviewer: Arc<dyn CodeReviewer>) -> Session {
        Session {
            reviewer,
            in_flight: AtomicBool::new(false),
            log: Mutex::new(AnalysisLog::new()),
        }
    }

    pub fn reviewer_name(&self) -> &str {
        self.reviewer.name()
    }

    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, SessionError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SessionError::Busy);
        }
        // Dropped on every exit path, including abandonment mid-await.
        let _guard = InFlightGuard(&self.in_flight);
        let result = match self.reviewer.analyze(request).await {
            Ok(result) => result,
            Err(err) => {
                error!(kind = err.kind(), backend = self.reviewer.name(), "analysis failed");
                return Err(err.into());
            }
        };
        if let Ok(mut log) = self.log.lock() {
            log.append(HistoryEntry::for_request(request));
        }
        Ok(result)
    }

    /// The most recent `n` history entries, newest first.
    pub fn history(&self, n: usize) -> Vec<HistoryEntry> {
        self.log
            .lock()
            .map(|log| log.recent(n))
            .unwrap_or_default()
    }

    /// Number of analyses completed successfully in this session.
    pub fn completed(&self) -> usize {
        self.log.lock().map(|log| log.len()).unwrap_or(0)
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
