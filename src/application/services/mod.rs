mod audio_validator;
mod preference_extractor;
mod preference_service;
mod recommendation_service;
mod voice_service;

pub use audio_validator::{validate_audio, ValidationError, ALLOWED_AUDIO_TYPES, MAX_AUDIO_BYTES};
pub use preference_extractor::{dedupe_candidates, extract_preferences};
pub use preference_service::{PreferenceDraft, PreferenceService, PreferenceServiceError};
pub use recommendation_service::{
    build_ranking_prompt, RankedItem, RecommendationError, RecommendationService,
};
pub use voice_service::{SaveOutcome, VoiceAnalysis, VoiceAnalysisService, VoiceError};
