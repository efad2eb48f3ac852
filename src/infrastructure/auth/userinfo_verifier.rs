use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{AuthError, TokenVerifier};
use crate::domain::UserId;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves bearer tokens against the issuer's OIDC userinfo endpoint.
/// Signature and expiry checks stay entirely with the issuer; the `sub`
/// claim becomes the user identifier.
pub struct UserInfoVerifier {
    client: reqwest::Client,
    userinfo_url: String,
}

impl UserInfoVerifier {
    pub fn new(issuer_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            userinfo_url: format!("{}/userinfo", issuer_url.trim_end_matches('/')),
        }
    }
}

#[derive(Deserialize)]
struct UserInfoResponse {
    #[serde(default)]
    sub: Option<String>,
}

#[async_trait]
impl TokenVerifier for UserInfoVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| AuthError::ProviderUnavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidToken(
                "rejected by identity provider".to_string(),
            ));
        }

        if !response.status().is_success() {
            return Err(AuthError::ProviderUnavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let info: UserInfoResponse = response
            .json()
            .await
            .map_err(|e| AuthError::ProviderUnavailable(format!("parse userinfo: {}", e)))?;

        match info.sub {
            Some(sub) if !sub.is_empty() => Ok(UserId::new(sub)),
            _ => Err(AuthError::InvalidToken("missing 'sub' claim".to_string())),
        }
    }
}
