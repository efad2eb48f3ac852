use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{Preference, PreferenceId, UserId};

/// Relational store for preference records, always scoped to a user. The
/// store's own row-level concurrency control is relied upon; no locking
/// happens above this trait.
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    async fn create(&self, preference: &Preference) -> Result<(), RepositoryError>;

    async fn get_by_id(
        &self,
        id: PreferenceId,
        user_id: &UserId,
    ) -> Result<Option<Preference>, RepositoryError>;

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Preference>, RepositoryError>;

    async fn update(&self, preference: &Preference) -> Result<(), RepositoryError>;

    async fn delete(&self, id: PreferenceId, user_id: &UserId) -> Result<(), RepositoryError>;
}
