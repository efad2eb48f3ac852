use std::sync::Arc;

use crate::application::ports::{InsightAnalyzer, LlmClient, SpeechToText, TokenVerifier};
use crate::application::services::{
    PreferenceService, RecommendationService, VoiceAnalysisService,
};

pub struct AppState<S, A, L>
where
    S: SpeechToText,
    A: InsightAnalyzer,
    L: LlmClient,
{
    pub voice_service: Arc<VoiceAnalysisService<S, A>>,
    pub preference_service: Arc<PreferenceService>,
    pub recommendation_service: Arc<RecommendationService<L>>,
    pub token_verifier: Arc<dyn TokenVerifier>,
}

impl<S, A, L> Clone for AppState<S, A, L>
where
    S: SpeechToText,
    A: InsightAnalyzer,
    L: LlmClient,
{
    fn clone(&self) -> Self {
        Self {
            voice_service: Arc::clone(&self.voice_service),
            preference_service: Arc::clone(&self.preference_service),
            recommendation_service: Arc::clone(&self.recommendation_service),
            token_verifier: Arc::clone(&self.token_verifier),
        }
    }
}
