use std::time::Duration;

use async_trait::async_trait;

use super::gemini_wire::{GenerateContentRequest, GenerateContentResponse};
use crate::application::ports::{LlmClient, LlmClientError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Gemini-backed JSON-mode generation, used for recommendation ranking.
pub struct GeminiGenerativeClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiGenerativeClient {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string()),
            model: model.unwrap_or_else(|| "gemini-2.0-flash".to_string()),
        }
    }
}

#[async_trait]
impl LlmClient for GeminiGenerativeClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmClientError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let request = GenerateContentRequest::json_mode(prompt, None);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        body.first_text()
            .ok_or_else(|| LlmClientError::InvalidResponse("empty candidates".to_string()))
    }
}
