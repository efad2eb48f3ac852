use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use mensa::application::ports::{MenuSource, PreferenceRepository, TokenVerifier};
use mensa::application::services::{
    PreferenceService, RecommendationService, VoiceAnalysisService,
};
use mensa::infrastructure::audio::ElevenLabsEngine;
use mensa::infrastructure::auth::UserInfoVerifier;
use mensa::infrastructure::llm::{GeminiGenerativeClient, GeminiInsightAnalyzer};
use mensa::infrastructure::menu::StaticMenuSource;
use mensa::infrastructure::observability::{init_tracing, TracingConfig};
use mensa::infrastructure::persistence::{create_pool, PgPreferenceRepository};
use mensa::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    init_tracing(
        TracingConfig {
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            json_format: settings.logging.enable_json,
            level: settings.logging.level.clone(),
        },
        settings.server.port,
    );

    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let speech_to_text = Arc::new(ElevenLabsEngine::new(
        settings.transcription.api_key.clone(),
        settings.transcription.base_url.clone(),
        Some(settings.transcription.model.clone()),
    ));
    let insight_analyzer = Arc::new(GeminiInsightAnalyzer::new(
        settings.analysis.api_key.clone(),
        settings.analysis.base_url.clone(),
        Some(settings.analysis.model.clone()),
    ));
    let llm_client = Arc::new(GeminiGenerativeClient::new(
        settings.analysis.api_key.clone(),
        settings.analysis.base_url.clone(),
        Some(settings.analysis.model.clone()),
    ));
    let preference_repository: Arc<dyn PreferenceRepository> =
        Arc::new(PgPreferenceRepository::new(pool));
    let token_verifier: Arc<dyn TokenVerifier> =
        Arc::new(UserInfoVerifier::new(&settings.auth.issuer_url));

    let menu_source: Arc<dyn MenuSource> = match &settings.recommendations.menu_file {
        Some(path) => {
            let document = tokio::fs::read_to_string(path).await?;
            Arc::new(StaticMenuSource::from_json(&document)?)
        }
        None => {
            tracing::warn!("MENU_FILE not set, serving the built-in demo menu");
            Arc::new(StaticMenuSource::demo())
        }
    };

    let voice_service = Arc::new(VoiceAnalysisService::new(
        speech_to_text,
        insight_analyzer,
        Arc::clone(&preference_repository),
    ));
    let preference_service = Arc::new(PreferenceService::new(Arc::clone(&preference_repository)));
    let recommendation_service = Arc::new(RecommendationService::new(
        llm_client,
        preference_repository,
        menu_source,
        settings.recommendations.top_k,
    ));

    let state = AppState {
        voice_service,
        preference_service,
        recommendation_service,
        token_verifier,
    };

    let router = create_router(state);

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
