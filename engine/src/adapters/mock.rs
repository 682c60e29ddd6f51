use crate::reviewer::{AnalysisError, AnalysisResult, CodeReviewer};
use crate::AnalysisRequest;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

/// Banner comment prepended to the echoed code.
pub const REWRITE_BANNER: &str =
    "// Reviewed by CodeRefine (offline mock) - original code returned unchanged";
/// Artificial latency emulating a live round trip.
pub const MOCK_LATENCY: Duration = Duration::from_secs(2);

/// Offline reviewer that synthesizes a fixed-shape critique without network
/// access. Deterministic for identical requests and never fails.
#[derive(Clone, Copy, Default)]
pub struct MockReviewer;

#[async_trait]
impl CodeReviewer for MockReviewer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        sleep(MOCK_LATENCY).await;
        let language = request.language().label();
        Ok(AnalysisResult {
            bugs: vec![
                format!("Possible unhandled edge case for empty input in this {language} snippet."),
                format!("A loop boundary in the {language} code may be off by one."),
            ],
            performance_issues: vec![format!(
                "Repeated work inside the main loop of the {language} code could be hoisted out."
            )],
            security_risks: vec![format!(
                "Inputs to the {language} code are used without validation or sanitization."
            )],
            suggestions: vec![
                format!("Add unit tests covering the failure paths of the {language} code."),
                "Name intermediate values to make the data flow easier to follow.".to_string(),
            ],
            rewritten_code: format!("{REWRITE_BANNER}\n{}", request.code()),
        })
    }
}
