use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use crate::application::ports::{PreferenceRepository, RepositoryError};
use crate::domain::{Preference, PreferenceId, PreferenceKind, UserId};

/// User-facing CRUD over stored preferences. The voice pipeline writes
/// through the repository directly; this service backs the explicit API.
pub struct PreferenceService {
    repository: Arc<dyn PreferenceRepository>,
}

/// Validated mutable fields of a preference, as accepted at the API
/// boundary. The kind is constrained to the fixed set the extractor uses.
#[derive(Debug, Clone)]
pub struct PreferenceDraft {
    pub kind: PreferenceKind,
    pub value: String,
    pub category: String,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PreferenceServiceError {
    #[error("preference not found")]
    NotFound,
    #[error("preference value must not be empty")]
    EmptyValue,
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}

impl PreferenceService {
    pub fn new(repository: Arc<dyn PreferenceRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(
        &self,
        user_id: &UserId,
        draft: PreferenceDraft,
    ) -> Result<Preference, PreferenceServiceError> {
        let draft = validated(draft)?;
        let now = Utc::now();
        let preference = Preference {
            id: PreferenceId::new(),
            user_id: user_id.clone(),
            category: draft.category,
            kind: draft.kind,
            value: draft.value,
            metadata: draft.metadata,
            created_at: now,
            updated_at: now,
        };

        self.repository.create(&preference).await?;
        Ok(preference)
    }

    pub async fn list(&self, user_id: &UserId) -> Result<Vec<Preference>, PreferenceServiceError> {
        Ok(self.repository.list_for_user(user_id).await?)
    }

    pub async fn update(
        &self,
        user_id: &UserId,
        id: PreferenceId,
        draft: PreferenceDraft,
    ) -> Result<Preference, PreferenceServiceError> {
        let draft = validated(draft)?;
        let mut preference = self
            .repository
            .get_by_id(id, user_id)
            .await?
            .ok_or(PreferenceServiceError::NotFound)?;

        preference.kind = draft.kind;
        preference.value = draft.value;
        preference.category = draft.category;
        preference.metadata = draft.metadata;
        preference.updated_at = Utc::now();

        self.repository.update(&preference).await?;
        Ok(preference)
    }

    pub async fn delete(
        &self,
        user_id: &UserId,
        id: PreferenceId,
    ) -> Result<(), PreferenceServiceError> {
        match self.repository.delete(id, user_id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound(_)) => Err(PreferenceServiceError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}

fn validated(mut draft: PreferenceDraft) -> Result<PreferenceDraft, PreferenceServiceError> {
    draft.value = draft.value.trim().to_string();
    if draft.value.is_empty() {
        return Err(PreferenceServiceError::EmptyValue);
    }
    if draft.category.trim().is_empty() {
        draft.category = "food".to_string();
    }
    Ok(draft)
}
