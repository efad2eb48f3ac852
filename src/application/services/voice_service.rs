use std::sync::Arc;

use crate::application::ports::{
    AnalysisError, InsightAnalyzer, PreferenceRepository, RepositoryError, SpeechToText,
    TranscriptionError,
};
use crate::application::services::audio_validator::{validate_audio, ValidationError};
use crate::application::services::preference_extractor::{dedupe_candidates, extract_preferences};
use crate::domain::{Emotion, Insight, Preference, PreferenceCandidate, Sentiment, UserId};

/// Orchestrates one voice request: validate, transcribe, analyze (or skip),
/// extract preferences, and persist them best-effort. Persistence failures
/// never fail the request.
pub struct VoiceAnalysisService<S, A>
where
    S: SpeechToText,
    A: InsightAnalyzer,
{
    speech_to_text: Arc<S>,
    insight_analyzer: Arc<A>,
    preferences: Arc<dyn PreferenceRepository>,
}

#[derive(Debug, Clone)]
pub struct VoiceAnalysis {
    pub transcript: String,
    pub sentiment: Sentiment,
    pub emotion: Emotion,
    pub intent: String,
    pub keywords: Vec<String>,
    pub summary: Option<String>,
    pub language_code: Option<String>,
}

/// Per-batch persistence result. Failures are recorded here for logging
/// rather than re-caught from broad error types.
#[derive(Debug, Default)]
pub struct SaveOutcome {
    pub saved: Vec<Preference>,
    pub failed: Vec<(PreferenceCandidate, RepositoryError)>,
}

#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),
    #[error("transcription: {0}")]
    Transcription(#[from] TranscriptionError),
    #[error("analysis: {0}")]
    Analysis(#[from] AnalysisError),
}

impl<S, A> VoiceAnalysisService<S, A>
where
    S: SpeechToText,
    A: InsightAnalyzer,
{
    pub fn new(
        speech_to_text: Arc<S>,
        insight_analyzer: Arc<A>,
        preferences: Arc<dyn PreferenceRepository>,
    ) -> Self {
        Self {
            speech_to_text,
            insight_analyzer,
            preferences,
        }
    }

    pub async fn analyze(
        &self,
        user_id: &UserId,
        audio: &[u8],
        content_type: Option<&str>,
        run_analysis: bool,
    ) -> Result<VoiceAnalysis, VoiceError> {
        validate_audio(content_type, audio.len())?;
        let content_type = content_type.unwrap_or_default();

        let transcription = self.speech_to_text.transcribe(audio, content_type).await?;

        tracing::debug!(
            chars = transcription.text.len(),
            language_code = ?transcription.language_code,
            "Transcription completed"
        );

        // Nothing was said: skip analysis and extraction entirely.
        if transcription.text.is_empty() {
            return Ok(VoiceAnalysis {
                transcript: String::new(),
                sentiment: Sentiment::Neutral,
                emotion: Emotion::Neutral,
                intent: "unclear".to_string(),
                keywords: Vec::new(),
                summary: None,
                language_code: transcription.language_code,
            });
        }

        let insight = if run_analysis {
            self.insight_analyzer.analyze(&transcription.text).await?
        } else {
            Insight::neutral(transcription.text.clone(), "unknown")
        };

        let candidates = dedupe_candidates(extract_preferences(
            &insight.transcript,
            &insight.intent,
            &insight.keywords,
        ));
        let extracted = candidates.len();

        let outcome = self.save_candidates(user_id, candidates).await;
        if extracted > 0 {
            tracing::info!(
                extracted,
                saved = outcome.saved.len(),
                failed = outcome.failed.len(),
                "Voice preferences persisted"
            );
        }

        Ok(VoiceAnalysis {
            transcript: insight.transcript,
            sentiment: insight.sentiment,
            emotion: insight.emotion,
            intent: insight.intent,
            keywords: insight.keywords,
            summary: insight.summary,
            language_code: transcription.language_code,
        })
    }

    /// Persists each candidate independently; one failure must not abort
    /// the remaining candidates.
    async fn save_candidates(
        &self,
        user_id: &UserId,
        candidates: Vec<PreferenceCandidate>,
    ) -> SaveOutcome {
        let mut outcome = SaveOutcome::default();

        for candidate in candidates {
            let preference = Preference::from_candidate(user_id.clone(), &candidate);
            match self.preferences.create(&preference).await {
                Ok(()) => outcome.saved.push(preference),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        kind = candidate.kind.as_str(),
                        value = %candidate.value,
                        "Failed to save extracted preference"
                    );
                    outcome.failed.push((candidate, e));
                }
            }
        }

        outcome
    }
}
