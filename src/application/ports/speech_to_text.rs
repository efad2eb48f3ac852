use async_trait::async_trait;

use crate::domain::TranscriptionResult;

/// External speech-to-text service. One attempt per call; the caller treats
/// failure as terminal for the request.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(
        &self,
        audio: &[u8],
        content_type: &str,
    ) -> Result<TranscriptionResult, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("transcription request timed out")]
    Timeout,
    #[error("transcription request failed: {0}")]
    RequestFailed(String),
    #[error("invalid transcription API key")]
    InvalidApiKey,
    #[error("transcription rate limit exceeded")]
    RateLimited,
    #[error("invalid audio: {0}")]
    InvalidAudio(String),
    #[error("transcription error {status}: {body}")]
    Api { status: u16, body: String },
}
