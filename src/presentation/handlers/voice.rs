use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::ports::{InsightAnalyzer, LlmClient, SpeechToText};
use crate::application::services::VoiceError;
use crate::infrastructure::observability::sanitize_transcript;
use crate::presentation::handlers::{require_user, ErrorResponse};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct VoiceAnalysisResponse {
    pub transcript: String,
    pub sentiment: String,
    pub emotion: String,
    pub intent: String,
    pub keywords: Vec<String>,
    pub summary: Option<String>,
    pub language_code: Option<String>,
}

#[tracing::instrument(skip(state, headers, multipart))]
pub async fn analyze_voice_handler<S, A, L>(
    State(state): State<AppState<S, A, L>>,
    headers: HeaderMap,
    mut multipart: Multipart,
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

    let mut audio: Option<(Vec<u8>, Option<String>)> = None;
    let mut run_analysis = true;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Failed to read multipart: {}", e),
                    }),
                )
                    .into_response();
            }
        };

        match field.name().unwrap_or_default() {
            "audio" => {
                let content_type = field.content_type().map(str::to_string);
                match field.bytes().await {
                    Ok(data) => audio = Some((data.to_vec(), content_type)),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read audio bytes");
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse {
                                error: format!("Failed to read audio file: {}", e),
                            }),
                        )
                            .into_response();
                    }
                }
            }
            "run_analysis" => {
                if let Ok(text) = field.text().await {
                    run_analysis = matches!(text.trim().to_lowercase().as_str(), "true" | "1");
                }
            }
            _ => {}
        }
    }

    let (audio_bytes, content_type) = match audio {
        Some(a) => a,
        None => {
            tracing::warn!("Voice request with no audio part");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No audio uploaded".to_string(),
                }),
            )
                .into_response();
        }
    };

    tracing::debug!(
        bytes = audio_bytes.len(),
        content_type = ?content_type,
        run_analysis,
        "Processing voice upload"
    );

    match state
        .voice_service
        .analyze(&user_id, &audio_bytes, content_type.as_deref(), run_analysis)
        .await
    {
        Ok(analysis) => {
            tracing::info!(
                transcript = %sanitize_transcript(&analysis.transcript),
                sentiment = analysis.sentiment.as_str(),
                keywords = analysis.keywords.len(),
                "Voice analysis completed"
            );
            (
                StatusCode::OK,
                Json(VoiceAnalysisResponse {
                    transcript: analysis.transcript,
                    sentiment: analysis.sentiment.as_str().to_string(),
                    emotion: analysis.emotion.as_str().to_string(),
                    intent: analysis.intent,
                    keywords: analysis.keywords,
                    summary: analysis.summary,
                    language_code: analysis.language_code,
                }),
            )
                .into_response()
        }
        Err(VoiceError::Validation(e)) => {
            tracing::warn!(error = %e, "Invalid audio upload");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
        Err(VoiceError::Transcription(e)) => {
            tracing::error!(error = %e, "Transcription stage failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: format!("Transcription failed: {}", e),
                }),
            )
                .into_response()
        }
        Err(VoiceError::Analysis(e)) => {
            tracing::error!(error = %e, "Analysis stage failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: format!("Analysis failed: {}", e),
                }),
            )
                .into_response()
        }
    }
}
