use async_trait::async_trait;

use crate::domain::UserId;

/// External identity verifier: bearer token in, stable user identifier out.
/// Token validation is fully delegated to the issuer.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<UserId, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),
}
