mod insight_analyzer;
mod llm_client;
mod menu_source;
mod preference_repository;
mod repository_error;
mod speech_to_text;
mod token_verifier;

pub use insight_analyzer::{AnalysisError, InsightAnalyzer};
pub use llm_client::{LlmClient, LlmClientError};
pub use menu_source::{MenuSource, MenuSourceError};
pub use preference_repository::PreferenceRepository;
pub use repository_error::RepositoryError;
pub use speech_to_text::{SpeechToText, TranscriptionError};
pub use token_verifier::{AuthError, TokenVerifier};
