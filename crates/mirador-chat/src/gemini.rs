use crate::port::{AssistantError, AssistantPort};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::instrument;

pub const GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
pub const GEMINI_TEMPERATURE: f64 = 0.4;
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Upper bound on one assistant invocation. The session handles events one
/// at a time, so an unbounded call would hang it.
pub const DEFAULT_ASSISTANT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct GeminiAssistant {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiAssistant {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistantError(format!("client build failed: {e}")))?;
        Ok(Self {
            client,
            base_url: GEMINI_API_BASE.to_string(),
            api_key: api_key.into(),
            model: GEMINI_MODEL.to_string(),
        })
    }

    /// Point the client at a different host. Used by tests.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

#[async_trait]
impl AssistantPort for GeminiAssistant {
    #[instrument(name = "assistant_generate", skip(self, prompt))]
    async fn complete(&self, prompt: &str) -> Result<String, AssistantError> {
        let body = json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {"temperature": GEMINI_TEMPERATURE},
        });
        let resp = self
            .client
            .post(self.generate_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError(format!("request failed: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AssistantError(format!(
                "assistant returned status {status}"
            )));
        }
        let value: Value = resp
            .json()
            .await
            .map_err(|e| AssistantError(format!("response decode failed: {e}")))?;
        candidate_text(&value)
    }
}

fn candidate_text(value: &Value) -> Result<String, AssistantError> {
    value["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AssistantError("malformed assistant response".to_string()))
}
