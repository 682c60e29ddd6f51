use crate::reviewer::{AnalysisError, AnalysisResult, CodeReviewer};
use crate::AnalysisRequest;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;

/// Default call deadline. Anything in the 30-60 second band suits
/// chat-completion latencies.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(45);

/// Wraps a reviewer with a hard deadline. Exactly one attempt is made per
/// call; when the deadline passes the in-flight future is dropped and
/// `Timeout` is returned.
#[derive(Clone)]
pub struct TimeoutReviewer<R: CodeReviewer> {
    inner: R,
    deadline: Duration,
}

impl<R: CodeReviewer> TimeoutReviewer<R> {
    pub fn new(inner: R, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    pub fn with_default(inner: R) -> Self {
        Self::new(inner, DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl<R: CodeReviewer> CodeReviewer for TimeoutReviewer<R> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        match timeout(self.deadline, self.inner.analyze(request)).await {
            Ok(res) => res,
            Err(_) => Err(AnalysisError::Timeout(self.deadline)),
        }
    }
}
