use crate::prompt::build_prompt;
use crate::response::normalize;
use crate::reviewer::{AnalysisError, AnalysisResult, CodeReviewer};
use crate::AnalysisRequest;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
/// Low sampling temperature so repeated reviews of the same code stay close.
pub const TEMPERATURE: f64 = 0.3;
/// Ceiling on generated tokens, bounding cost and latency per call.
pub const MAX_TOKENS: u32 = 4000;

/// Live reviewer speaking the OpenAI-compatible chat-completions protocol.
/// One outbound call per `analyze` invocation; no retries, no caching.
#[derive(Clone)]
pub struct GroqReviewer {
    client: reqwest::Client,
    model_name: String,
    api_key: String,
    base_url: String,
    temperature: f64,
    max_tokens: u32,
}

impl GroqReviewer {
    pub fn new(model_name: String, api_key: String, base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            model_name,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn request_body(&self, request: &AnalysisRequest) -> serde_json::Value {
        let prompt = build_prompt(request);
        json!({
            "model": self.model_name,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "response_format": { "type": "json_object" },
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user},
            ],
        })
    }
}

#[async_trait]
impl CodeReviewer for GroqReviewer {
    fn name(&self) -> &str {
        &self.model_name
    }

    async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        if self.api_key.trim().is_empty() {
            return Err(AnalysisError::Config(
                "api key is empty; set GROQ_API_KEY or the api_key config field".to_string(),
            ));
        }

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = self.request_body(request);
        debug!(
            model = %self.model_name,
            task = %request.task(),
            language = %request.language(),
            "sending chat completion request"
        );

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            error!(%status, "chat completion request failed");
            return Err(AnalysisError::Network(format!(
                "status {status}: {}",
                provider_message(&body_text)
            )));
        }

        let parsed: ChatCompletionResponse = resp
            .json()
            .await
            .map_err(|e| AnalysisError::Network(format!("failed to read response body: {e}")))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AnalysisError::MalformedResponse {
                message: "reply carried no message content".to_string(),
                raw: String::new(),
            })?;

        let result = normalize(&content)?;
        debug!(
            model = %self.model_name,
            issues = result.issue_count(),
            "chat completion parsed"
        );
        Ok(result)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Pull the human-readable message out of a provider error body, falling
/// back to the raw text.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|err| err.message)
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Language, TaskKind};

    fn sample_request() -> AnalysisRequest {
        AnalysisRequest::new("x=1", Language::Python, TaskKind::Bugs).unwrap()
    }

    #[tokio::test]
    async fn empty_api_key_fails_fast_without_network() {
        let reviewer = GroqReviewer::new(DEFAULT_MODEL.to_string(), String::new(), None);
        let err = reviewer.analyze(&sample_request()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)), "got {err:?}");

        let reviewer = GroqReviewer::new(DEFAULT_MODEL.to_string(), "   ".to_string(), None);
        let err = reviewer.analyze(&sample_request()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)), "got {err:?}");
    }

    #[test]
    fn request_body_carries_the_documented_knobs() {
        let reviewer = GroqReviewer::new(DEFAULT_MODEL.to_string(), "key".to_string(), None);
        let body = reviewer.request_body(&sample_request());
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["temperature"], TEMPERATURE);
        assert_eq!(body["max_tokens"], MAX_TOKENS);
        assert_eq!(body["response_format"]["type"], "json_object");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert!(messages[1]["content"].as_str().unwrap().contains("x=1"));
    }

    #[test]
    fn sampling_overrides_apply() {
        let reviewer = GroqReviewer::new(DEFAULT_MODEL.to_string(), "key".to_string(), None)
            .with_temperature(0.1)
            .with_max_tokens(1024);
        let body = reviewer.request_body(&sample_request());
        assert_eq!(body["temperature"], 0.1);
        assert_eq!(body["max_tokens"], 1024);
    }

    #[test]
    fn provider_message_prefers_structured_error() {
        let body = r#"{"error": {"message": "Invalid API Key", "type": "invalid_request_error"}}"#;
        assert_eq!(provider_message(body), "Invalid API Key");
        assert_eq!(provider_message("upstream exploded"), "upstream exploded");
        assert_eq!(provider_message(""), "");
    }

    #[test]
    fn name_reports_the_model() {
        let reviewer =
            GroqReviewer::new("llama-3.3-70b".to_string(), "key".to_string(), None);
        assert_eq!(reviewer.name(), "llama-3.3-70b");
    }
}
