use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::{InsightAnalyzer, LlmClient, SpeechToText};
use crate::application::services::{PreferenceDraft, PreferenceServiceError};
use crate::domain::{Preference, PreferenceId, PreferenceKind};
use crate::presentation::handlers::{require_user, ErrorResponse};
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct PreferenceRequest {
    pub preference_type: String,
    pub value: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

fn default_category() -> String {
    "food".to_string()
}

#[derive(Serialize)]
pub struct PreferenceResponse {
    pub id: Uuid,
    pub preference_type: String,
    pub value: String,
    pub category: String,
    pub metadata: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Preference> for PreferenceResponse {
    fn from(preference: Preference) -> Self {
        Self {
            id: preference.id.as_uuid(),
            preference_type: preference.kind.as_str().to_string(),
            value: preference.value,
            category: preference.category,
            metadata: preference.metadata,
            created_at: preference.created_at,
            updated_at: preference.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct PreferenceExportResponse {
    pub user_id: String,
    pub preferences: Vec<ExportedPreference>,
}

#[derive(Serialize)]
pub struct ExportedPreference {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub category: String,
    pub metadata: BTreeMap<String, String>,
}

/// The boundary enforces the same fixed preference-type set the voice
/// extractor produces.
fn parse_draft(request: PreferenceRequest) -> Result<PreferenceDraft, String> {
    let kind: PreferenceKind = request.preference_type.parse()?;
    Ok(PreferenceDraft {
        kind,
        value: request.value,
        category: request.category,
        metadata: request.metadata,
    })
}

fn service_error_response(e: PreferenceServiceError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match e {
        PreferenceServiceError::NotFound => StatusCode::NOT_FOUND,
        PreferenceServiceError::EmptyValue => StatusCode::UNPROCESSABLE_ENTITY,
        PreferenceServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

#[tracing::instrument(skip(state, headers, request))]
pub async fn create_preference_handler<S, A, L>(
    State(state): State<AppState<S, A, L>>,
    headers: HeaderMap,
    Json(request): Json<PreferenceRequest>,
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

    let draft = match parse_draft(request) {
        Ok(draft) => draft,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse { error: e }),
            )
                .into_response();
        }
    };

    match state.preference_service.create(&user_id, draft).await {
        Ok(preference) => {
            tracing::info!(preference_id = %preference.id.as_uuid(), "Preference created");
            (
                StatusCode::CREATED,
                Json(PreferenceResponse::from(preference)),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create preference");
            service_error_response(e).into_response()
        }
    }
}

#[tracing::instrument(skip(state, headers))]
pub async fn list_preferences_handler<S, A, L>(
    State(state): State<AppState<S, A, L>>,
    headers: HeaderMap,
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

    match state.preference_service.list(&user_id).await {
        Ok(preferences) => {
            let body: Vec<PreferenceResponse> = preferences
                .into_iter()
                .map(PreferenceResponse::from)
                .collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list preferences");
            service_error_response(e).into_response()
        }
    }
}

/// Preferences in a compact shape meant for prompt ingestion.
#[tracing::instrument(skip(state, headers))]
pub async fn export_preferences_handler<S, A, L>(
    State(state): State<AppState<S, A, L>>,
    headers: HeaderMap,
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

    match state.preference_service.list(&user_id).await {
        Ok(preferences) => {
            let exported = preferences
                .into_iter()
                .map(|p| ExportedPreference {
                    kind: p.kind.as_str().to_string(),
                    value: p.value,
                    category: p.category,
                    metadata: p.metadata,
                })
                .collect();
            (
                StatusCode::OK,
                Json(PreferenceExportResponse {
                    user_id: user_id.to_string(),
                    preferences: exported,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to export preferences");
            service_error_response(e).into_response()
        }
    }
}

#[tracing::instrument(skip(state, headers, request))]
pub async fn update_preference_handler<S, A, L>(
    State(state): State<AppState<S, A, L>>,
    Path(preference_id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<PreferenceRequest>,
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

    let draft = match parse_draft(request) {
        Ok(draft) => draft,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse { error: e }),
            )
                .into_response();
        }
    };

    match state
        .preference_service
        .update(&user_id, PreferenceId::from_uuid(preference_id), draft)
        .await
    {
        Ok(preference) => (StatusCode::OK, Json(PreferenceResponse::from(preference))).into_response(),
        Err(PreferenceServiceError::NotFound) => {
            tracing::warn!(preference_id = %preference_id, "Preference not found for update");
            service_error_response(PreferenceServiceError::NotFound).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to update preference");
            service_error_response(e).into_response()
        }
    }
}

#[tracing::instrument(skip(state, headers))]
pub async fn delete_preference_handler<S, A, L>(
    State(state): State<AppState<S, A, L>>,
    Path(preference_id): Path<Uuid>,
    headers: HeaderMap,
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
        .preference_service
        .delete(&user_id, PreferenceId::from_uuid(preference_id))
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(PreferenceServiceError::NotFound) => {
            tracing::warn!(preference_id = %preference_id, "Preference not found for delete");
            service_error_response(PreferenceServiceError::NotFound).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete preference");
            service_error_response(e).into_response()
        }
    }
}
