use crate::reviewer::{AnalysisError, AnalysisResult};
use serde::Deserialize;
use tracing::warn;

/// Wire shape of a structured reply. Every field is optional so absent keys
/// can be told apart from empty ones.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReview {
    bugs: Option<Vec<String>>,
    performance_issues: Option<Vec<String>>,
    security_risks: Option<Vec<String>>,
    suggestions: Option<Vec<String>>,
    rewritten_code: Option<String>,
}

impl WireReview {
    fn recognized_keys(&self) -> usize {
        [
            self.bugs.is_some(),
            self.performance_issues.is_some(),
            self.security_risks.is_some(),
            self.suggestions.is_some(),
            self.rewritten_code.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

/// Normalize a raw model reply into an `AnalysisResult`.
///
/// The reply must contain one JSON object carrying at least one of the five
/// contract keys; absent keys default to empty. An object with none of the
/// keys, a non-JSON reply, or a key of the wrong shape is a
/// `MalformedResponse` carrying the raw text for diagnostics. Idempotent on
/// already-valid result-shaped JSON.
pub fn normalize(raw: &str) -> Result<AnalysisResult, AnalysisError> {
    let wire = parse_wire(raw)?;
    if wire.recognized_keys() == 0 {
        return Err(malformed(
            "object carries none of the expected keys".to_string(),
            raw,
        ));
    }
    Ok(AnalysisResult {
        bugs: wire.bugs.unwrap_or_default(),
        performance_issues: wire.performance_issues.unwrap_or_default(),
        security_risks: wire.security_risks.unwrap_or_default(),
        suggestions: wire.suggestions.unwrap_or_default(),
        rewritten_code: wire.rewritten_code.unwrap_or_default(),
    })
}

fn parse_wire(raw: &str) -> Result<WireReview, AnalysisError> {
    let strict_err = match serde_json::from_str(raw) {
        Ok(wire) => return Ok(wire),
        Err(err) => err,
    };
    // Degraded path: the model wrapped the object in prose or ``` fences.
    // Retry on the outermost brace span before giving up.
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            warn!(start, end, "strict parse failed, retrying on brace-extracted span");
            return serde_json::from_str(&raw[start..=end])
                .map_err(|err| malformed(err.to_string(), raw));
        }
    }
    Err(malformed(strict_err.to_string(), raw))
}

fn malformed(message: String, raw: &str) -> AnalysisError {
    AnalysisError::MalformedResponse {
        message,
        raw: raw.to_string(),
    }
}
