use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::ports::{InsightAnalyzer, LlmClient, SpeechToText};
use crate::application::services::RecommendationError;
use crate::presentation::handlers::{require_user, ErrorResponse};
use crate::presentation::state::AppState;

#[derive(Deserialize, Default)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendedItem>,
}

#[derive(Serialize)]
pub struct RecommendedItem {
    pub item: String,
    pub score: f32,
    pub reason: String,
}

#[tracing::instrument(skip(state, headers, request))]
pub async fn recommendations_handler<S, A, L>(
    State(state): State<AppState<S, A, L>>,
    headers: HeaderMap,
    Json(request): Json<RecommendationRequest>,
) -> impl IntoResponse
where
    S: SpeechToText + 'static,
    A: InsightAnalyzer + 'static,
    L: LlmClient + 'static,
{
    let user_id = match require_user(state.token_verifier.as_ref(), &headers).await {
        Ok(user_id) => user_id,
        Err(response) => return response.into_response(),
    };

    match state
        .recommendation_service
        .recommend(&user_id, request.top_k)
        .await
    {
        Ok(ranked) => {
            tracing::info!(items = ranked.len(), "Recommendations generated");
            let recommendations = ranked
                .into_iter()
                .map(|r| RecommendedItem {
                    item: r.item,
                    score: r.score,
                    reason: r.reason,
                })
                .collect();
            (
                StatusCode::OK,
                Json(RecommendationResponse { recommendations }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Recommendation failed");
            let status = match e {
                RecommendationError::Menu(_) => StatusCode::SERVICE_UNAVAILABLE,
                RecommendationError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
                RecommendationError::Generation(_) | RecommendationError::InvalidResponse(_) => {
                    StatusCode::BAD_GATEWAY
                }
            };
            (
                status,
                Json(ErrorResponse {
                    error: format!("Recommendation failed: {}", e),
                }),
            )
                .into_response()
        }
    }
}
