//! LLM (`OpenAI`) API client module
//!
//! Sends a single-turn chat completion and returns the first answer.

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::MessageRole;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tracing::info;

use crate::errors::BotError;

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// Anything that can turn a prompt into an answer.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no answer text.
    async fn complete(&self, prompt: &str) -> Result<String, BotError>;
}

/// Chat completion client for `OpenAI`-compatible endpoints
pub struct LlmClient {
    http: Client,
    api_key: String,
    org_id: Option<String>,
    model_name: String,
    api_base: String,
}

impl LlmClient {
    #[must_use]
    pub fn new(
        http: Client,
        api_key: String,
        org_id: Option<String>,
        model_name: String,
        api_base: String,
    ) -> Self {
        Self {
            http,
            api_key,
            org_id,
            model_name,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Request body for a one-message conversation.
    #[must_use]
    pub fn build_request(&self, prompt: &str) -> Value {
        json!({
            "model": self.model_name,
            "messages": [
                { "role": MessageRole::assistant, "content": prompt }
            ]
        })
    }

    fn headers(&self) -> Result<HeaderMap, BotError> {
        let mut headers = HeaderMap::new();
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| BotError::HttpError(format!("Invalid Authorization header: {e}")))?;
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(org) = &self.org_id {
            let org_value = HeaderValue::from_str(org).map_err(|e| {
                BotError::HttpError(format!("Invalid OpenAI-Organization header: {e}"))
            })?;
            headers.insert("OpenAI-Organization", org_value);
        }

        Ok(headers)
    }
}

/// Pulls `choices[0].message.content` out of a completion response.
///
/// # Errors
///
/// Returns an error when the response carries no answer text.
pub fn extract_answer(response: &Value) -> Result<String, BotError> {
    response
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| {
            BotError::OpenAIError("Response did not contain choices[0].message.content".to_string())
        })
}

#[async_trait]
impl CompletionModel for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, BotError> {
        #[cfg(feature = "debug-logs")]
        info!("Using ChatGPT prompt:\n{}", prompt);

        info!(
            model = %self.model_name,
            estimated_tokens = estimate_tokens(prompt),
            "Requesting chat completion"
        );

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .headers(self.headers()?)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| BotError::HttpError(format!("OpenAI API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(BotError::OpenAIError(format!(
                "OpenAI API error (status {status}): {error_text}"
            )));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            BotError::OpenAIError(format!("Failed to parse OpenAI response: {e}"))
        })?;

        extract_answer(&response_json)
    }
}
