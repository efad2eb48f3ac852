use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{PreferenceRepository, RepositoryError};
use crate::domain::{Preference, PreferenceId, PreferenceKind, UserId};

pub struct PgPreferenceRepository {
    pool: PgPool,
}

impl PgPreferenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_query_error(e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db)
            if db.is_unique_violation()
                || db.is_foreign_key_violation()
                || db.is_check_violation() =>
        {
            RepositoryError::ConstraintViolation(db.message().to_string())
        }
        _ => RepositoryError::QueryFailed(e.to_string()),
    }
}

fn metadata_to_json(metadata: &BTreeMap<String, String>) -> serde_json::Value {
    serde_json::Value::Object(
        metadata
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect(),
    )
}

fn row_to_preference(row: &PgRow) -> Result<Preference, RepositoryError> {
    let id: Uuid = row
        .try_get("id")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let user_id: String = row
        .try_get("user_id")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let category: String = row
        .try_get("category")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let kind_str: String = row
        .try_get("preference_type")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let value: String = row
        .try_get("value")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let metadata_json: serde_json::Value = row
        .try_get("metadata")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

    let kind: PreferenceKind = kind_str.parse().map_err(RepositoryError::QueryFailed)?;

    let metadata = metadata_json
        .as_object()
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default();

    Ok(Preference {
        id: PreferenceId::from_uuid(id),
        user_id: UserId::new(user_id),
        category,
        kind,
        value,
        metadata,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl PreferenceRepository for PgPreferenceRepository {
    #[instrument(skip(self, preference), fields(preference_id = %preference.id.as_uuid()))]
    async fn create(&self, preference: &Preference) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO preferences
                (id, user_id, category, preference_type, value, metadata, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(preference.id.as_uuid())
        .bind(preference.user_id.as_str())
        .bind(&preference.category)
        .bind(preference.kind.as_str())
        .bind(&preference.value)
        .bind(metadata_to_json(&preference.metadata))
        .bind(preference.created_at)
        .bind(preference.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_query_error)?;

        Ok(())
    }

    #[instrument(skip(self), fields(preference_id = %id.as_uuid()))]
    async fn get_by_id(
        &self,
        id: PreferenceId,
        user_id: &UserId,
    ) -> Result<Option<Preference>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, category, preference_type, value, metadata, created_at, updated_at
            FROM preferences
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(row_to_preference(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, user_id))]
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Preference>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, category, preference_type, value, metadata, created_at, updated_at
            FROM preferences
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.iter().map(row_to_preference).collect()
    }

    #[instrument(skip(self, preference), fields(preference_id = %preference.id.as_uuid()))]
    async fn update(&self, preference: &Preference) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE preferences
            SET category = $1, preference_type = $2, value = $3, metadata = $4, updated_at = $5
            WHERE id = $6 AND user_id = $7
            "#,
        )
        .bind(&preference.category)
        .bind(preference.kind.as_str())
        .bind(&preference.value)
        .bind(metadata_to_json(&preference.metadata))
        .bind(preference.updated_at)
        .bind(preference.id.as_uuid())
        .bind(preference.user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "preference {}",
                preference.id.as_uuid()
            )));
        }

        Ok(())
    }

    #[instrument(skip(self, user_id), fields(preference_id = %id.as_uuid()))]
    async fn delete(&self, id: PreferenceId, user_id: &UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM preferences
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "preference {}",
                id.as_uuid()
            )));
        }

        Ok(())
    }
}
