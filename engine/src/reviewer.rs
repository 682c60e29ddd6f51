use crate::AnalysisRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Structured critique produced by a backend. All five fields are always
/// present; consumers branch on emptiness, never on a missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    pub bugs: Vec<String>,
    pub performance_issues: Vec<String>,
    pub security_risks: Vec<String>,
    pub suggestions: Vec<String>,
    pub rewritten_code: String,
}

impl AnalysisResult {
    /// Total entries across the four issue categories.
    pub fn issue_count(&self) -> usize {
        self.bugs.len()
            + self.performance_issues.len()
            + self.security_risks.len()
            + self.suggestions.len()
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("malformed response: {message}")]
    MalformedResponse { message: String, raw: String },
}

impl AnalysisError {
    /// Short kind tag for log lines and caller-facing messages.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Config(_) => "config",
            AnalysisError::Network(_) => "network",
            AnalysisError::Timeout(_) => "timeout",
            AnalysisError::MalformedResponse { .. } => "malformed_response",
        }
    }
}

#[async_trait]
pub trait CodeReviewer: Send + Sync {
    fn name(&self) -> &str;
    async fn analyze(&self, request: &AnalysisRequest)
        -> Result<AnalysisResult, AnalysisError>;
}
