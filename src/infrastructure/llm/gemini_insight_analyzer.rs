use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::gemini_wire::{GenerateContentRequest, GenerateContentResponse};
use crate::application::ports::{AnalysisError, InsightAnalyzer};
use crate::domain::{Emotion, Insight, Sentiment};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Gemini-backed transcript analysis with a schema-constrained JSON
/// response.
pub struct GeminiInsightAnalyzer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiInsightAnalyzer {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string()),
            model: model.unwrap_or_else(|| "gemini-2.0-flash".to_string()),
        }
    }

    fn build_prompt(transcript: &str) -> String {
        format!(
            "Analyze the following transcribed speech from a food/restaurant context.
Return structured insights: sentiment (positive/neutral/negative), emotion, user intent, and key terms.

Transcript:
---
{transcript}
---

Focus on food-related intents (ordering, feedback, questions, dietary needs, preferences).
Extract relevant keywords (dishes, ingredients, dietary restrictions, emotions).
Provide a brief summary if the transcript is long or nuanced."
        )
    }

    fn response_schema() -> serde_json::Value {
        let emotions: Vec<&str> = Emotion::ALL.iter().map(|e| e.as_str()).collect();
        json!({
            "type": "object",
            "properties": {
                "transcript": { "type": "string" },
                "sentiment": { "type": "string", "enum": ["positive", "neutral", "negative"] },
                "emotion": { "type": "string", "enum": emotions },
                "intent": { "type": "string" },
                "keywords": { "type": "array", "items": { "type": "string" } },
                "summary": { "type": "string", "nullable": true }
            },
            "required": ["transcript", "sentiment", "emotion", "intent", "keywords"]
        })
    }
}

/// JSON payload the model is constrained to produce. Validated at this
/// boundary; nothing loosely typed travels further in.
#[derive(Deserialize)]
struct InsightPayload {
    transcript: String,
    sentiment: String,
    emotion: String,
    intent: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    summary: Option<String>,
}

impl InsightPayload {
    fn into_insight(self) -> Result<Insight, String> {
        let sentiment: Sentiment = self.sentiment.parse()?;
        let emotion: Emotion = self.emotion.parse()?;
        Ok(Insight {
            transcript: self.transcript,
            sentiment,
            emotion,
            intent: self.intent,
            keywords: self.keywords,
            summary: self.summary.filter(|s| !s.trim().is_empty()),
        })
    }
}

#[async_trait]
impl InsightAnalyzer for GeminiInsightAnalyzer {
    async fn analyze(&self, transcript: &str) -> Result<Insight, AnalysisError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let request = GenerateContentRequest::json_mode(
            &Self::build_prompt(transcript),
            Some(Self::response_schema()),
        );

        tracing::debug!(model = %self.model, chars = transcript.len(), "Requesting transcript analysis");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::RequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::RequestFailed(format!("parse response: {}", e)))?;

        let text = body.first_text().ok_or(AnalysisError::EmptyResponse)?;

        let payload: InsightPayload = serde_json::from_str(&text)
            .map_err(|e| AnalysisError::RequestFailed(format!("invalid insight payload: {}", e)))?;

        payload
            .into_insight()
            .map_err(AnalysisError::RequestFailed)
    }
}
