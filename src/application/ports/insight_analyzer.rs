use async_trait::async_trait;

use crate::domain::Insight;

/// External generative-language analysis. Only invoked with a non-empty
/// transcript; the pipeline substitutes a neutral insight when skipped.
#[async_trait]
pub trait InsightAnalyzer: Send + Sync {
    async fn analyze(&self, transcript: &str) -> Result<Insight, AnalysisError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("analysis returned empty response")]
    EmptyResponse,
    #[error("analysis request failed: {0}")]
    RequestFailed(String),
}
