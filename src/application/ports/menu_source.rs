use async_trait::async_trait;

use crate::domain::MenuItem;

/// Opaque provider of candidate menu items for ranking.
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn list_items(&self) -> Result<Vec<MenuItem>, MenuSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MenuSourceError {
    #[error("menu source unavailable: {0}")]
    Unavailable(String),
}
