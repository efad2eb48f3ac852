use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;

use crate::application::ports::{AuthError, TokenVerifier};
use crate::domain::UserId;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Resolves the authenticated user from the Authorization header, or
/// produces the response the endpoint should return instead.
pub async fn require_user(
    verifier: &dyn TokenVerifier,
    headers: &HeaderMap,
) -> Result<UserId, (StatusCode, Json<ErrorResponse>)> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let token = match token {
        Some(t) => t,
        None => {
            tracing::debug!("Request without bearer token");
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: AuthError::MissingToken.to_string(),
                }),
            ));
        }
    };

    match verifier.verify(token).await {
        Ok(user_id) => Ok(user_id),
        Err(e @ AuthError::ProviderUnavailable(_)) => {
            tracing::error!(error = %e, "Identity provider unreachable");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Token rejected");
            Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
