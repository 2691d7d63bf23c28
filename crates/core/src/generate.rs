//! Text-generation capability.
//!
//! The pipeline only needs `generate(model, prompt) -> text`. [`GeminiClient`]
//! implements it against the Gemini `generateContent` REST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::{AgendaError, Result};

/// Default model used for summaries and action extraction.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-001";

/// Default Gemini API base url.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Text-generation capability.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends `prompt` to `model` and returns the generated text.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String>;
}

/// [`TextGenerator`] backed by the Gemini REST API.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AgendaError::Config("GOOGLE_API_KEY is not set".to_string()));
        }
        let http = Client::builder()
            .pool_max_idle_per_host(4)
            .connect_timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { http, api_key, base_url: base_url.into().trim_end_matches('/').to_string() })
    }

    async fn generate_content(&self, model: &str, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        });

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(AgendaError::UnexpectedResponse(format!("gemini {}: {}", status, message)));
        }

        let v: Value = resp.json().await?;
        response_text(&v)
    }
}

/// Concatenates the text parts of the first candidate.
fn response_text(v: &Value) -> Result<String> {
    let parts = v
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| AgendaError::UnexpectedResponse("missing candidates[0].content.parts".to_string()))?;

    Ok(parts.iter().filter_map(|p| p.get("text").and_then(Value::as_str)).collect())
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        tracing::debug!(model, prompt_chars = prompt.chars().count(), "requesting generation");
        self.generate_content(model, prompt)
            .await
            .map_err(|e| AgendaError::GenerationFailure(e.to_string()))
    }
}
