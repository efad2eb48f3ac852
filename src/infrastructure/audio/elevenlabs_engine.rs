use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{SpeechToText, TranscriptionError};
use crate::domain::TranscriptionResult;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_ERROR_BODY_CHARS: usize = 500;

pub struct ElevenLabsEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ElevenLabsEngine {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://api.elevenlabs.io".to_string()),
            model: model.unwrap_or_else(|| "scribe_v2".to_string()),
        }
    }
}

#[derive(Deserialize)]
struct SpeechToTextResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    language_code: Option<String>,
}

#[derive(Deserialize)]
struct UnprocessableResponse {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

#[async_trait]
impl SpeechToText for ElevenLabsEngine {
    async fn transcribe(
        &self,
        audio: &[u8],
        content_type: &str,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let url = format!(
            "{}/v1/speech-to-text",
            self.base_url.trim_end_matches('/')
        );

        let file_part = multipart::Part::bytes(audio.to_vec())
            .file_name("audio.webm")
            .mime_str(content_type)
            .map_err(|e| TranscriptionError::RequestFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .text("model_id", self.model.clone())
            .part("file", file_part);

        tracing::debug!(model = %self.model, bytes = audio.len(), "Sending audio for transcription");

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(REQUEST_TIMEOUT)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranscriptionError::Timeout
                } else {
                    TranscriptionError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        match status.as_u16() {
            401 => return Err(TranscriptionError::InvalidApiKey),
            429 => return Err(TranscriptionError::RateLimited),
            422 => {
                let detail = response
                    .json::<UnprocessableResponse>()
                    .await
                    .ok()
                    .and_then(|r| r.detail)
                    .map(unprocessable_detail)
                    .unwrap_or_else(|| "Unprocessable audio".to_string());
                return Err(TranscriptionError::InvalidAudio(detail));
            }
            s if s >= 400 => {
                let body = response.text().await.unwrap_or_default();
                return Err(TranscriptionError::Api {
                    status: s,
                    body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
                });
            }
            _ => {}
        }

        let result: SpeechToTextResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::RequestFailed(format!("parse response: {}", e)))?;

        tracing::info!(chars = result.text.len(), "Transcription completed");

        Ok(TranscriptionResult {
            text: result.text.trim().to_string(),
            language_code: result.language_code,
        })
    }
}

fn unprocessable_detail(detail: serde_json::Value) -> String {
    match detail {
        serde_json::Value::String(s) => s,
        serde_json::Value::Object(map) => map
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| serde_json::Value::Object(map).to_string()),
        other => other.to_string(),
    }
}
