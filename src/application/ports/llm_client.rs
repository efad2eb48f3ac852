use async_trait::async_trait;

/// Free-form generation against the generative-language API, used for
/// recommendation ranking. The prompt carries all context; the response is
/// expected to be JSON but is validated by the caller.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("generation request failed: {0}")]
    ApiRequestFailed(String),
    #[error("generation rate limit exceeded")]
    RateLimited,
    #[error("unusable generation response: {0}")]
    InvalidResponse(String),
}
