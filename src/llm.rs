use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::config::Settings;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status}: {body}")]
    Api { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("GOOGLE_API_KEY is not configured")]
    NotConfigured,
}

/// Anything that turns a prompt into raw model text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self, LlmError> {
        let api_key = settings.api_key().ok_or(LlmError::NotConfigured)?.to_string();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
        })
    }

    fn request_body(prompt: &str, temperature: f32, max_output_tokens: u32) -> serde_json::Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
            "generationConfig": {
                "temperature": temperature,
                "maxOutputTokens": max_output_tokens,
            },
        })
    }

    /// Concatenated text of every part of the first candidate.
    fn response_text(resp: &serde_json::Value) -> Result<String, LlmError> {
        let parts = resp["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| LlmError::Parse("missing candidates[0].content.parts".into()))?;

        let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
        if text.is_empty() {
            return Err(LlmError::Parse("candidate has no text parts".into()));
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/{}:generateContent", API_BASE, self.model);
        let body = Self::request_body(prompt, self.temperature, self.max_output_tokens);

        debug!(model = %self.model, prompt_chars = prompt.len(), "Gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let resp: serde_json::Value = response.json().await?;
        Self::response_text(&resp)
    }
}

/// The configured generator, or `None` when no usable key is set.
pub fn generator_from_settings(
    settings: &Settings,
) -> Result<Option<Arc<dyn TextGenerator>>, LlmError> {
    match GeminiClient::from_settings(settings) {
        Ok(client) => Ok(Some(Arc::new(client))),
        Err(LlmError::NotConfigured) => Ok(None),
        Err(e) => Err(e),
    }
}

// ── Tests ──
