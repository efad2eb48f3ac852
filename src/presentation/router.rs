use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{InsightAnalyzer, LlmClient, SpeechToText};
use crate::application::services::MAX_AUDIO_BYTES;
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    analyze_voice_handler, create_preference_handler, delete_preference_handler,
    export_preferences_handler, health_handler, list_preferences_handler,
    recommendations_handler, update_preference_handler,
};
use crate::presentation::state::AppState;

pub fn create_router<S, A, L>(state: AppState<S, A, L>) -> Router
where
    S: SpeechToText + 'static,
    A: InsightAnalyzer + 'static,
    L: LlmClient + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Headroom over the audio cap for multipart framing; the validator
    // enforces the real limit with a proper 422.
    let body_limit = DefaultBodyLimit::max(MAX_AUDIO_BYTES + 1024 * 1024);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/voice/analyze", post(analyze_voice_handler::<S, A, L>))
        .route(
            "/api/v1/preferences",
            get(list_preferences_handler::<S, A, L>).post(create_preference_handler::<S, A, L>),
        )
        .route(
            "/api/v1/preferences/export",
            get(export_preferences_handler::<S, A, L>),
        )
        .route(
            "/api/v1/preferences/{preference_id}",
            put(update_preference_handler::<S, A, L>)
                .delete(delete_preference_handler::<S, A, L>),
        )
        .route(
            "/api/v1/recommendations",
            post(recommendations_handler::<S, A, L>),
        )
        .layer(body_limit)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
