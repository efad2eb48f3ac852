use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A dietary preference stored for a user. One user may own arbitrarily
/// many; duplicate detection only happens within a single extraction batch,
/// never against previously stored rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Preference {
    pub id: PreferenceId,
    pub user_id: super::UserId,
    pub category: String,
    pub kind: PreferenceKind,
    pub value: String,
    pub metadata: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Preference {
    pub fn from_candidate(user_id: super::UserId, candidate: &PreferenceCandidate) -> Self {
        let now = Utc::now();
        Self {
            id: PreferenceId::new(),
            user_id,
            category: candidate.category.clone(),
            kind: candidate.kind,
            value: candidate.value.clone(),
            metadata: candidate.metadata.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreferenceId(Uuid);

impl PreferenceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PreferenceId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKind {
    Allergy,
    Dislike,
    Restriction,
}

impl PreferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKind::Allergy => "allergy",
            PreferenceKind::Dislike => "dislike",
            PreferenceKind::Restriction => "restriction",
        }
    }
}

impl std::str::FromStr for PreferenceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allergy" => Ok(Self::Allergy),
            "dislike" => Ok(Self::Dislike),
            "restriction" => Ok(Self::Restriction),
            other => Err(format!(
                "invalid preference type: {}. Expected: allergy, dislike, or restriction",
                other
            )),
        }
    }
}

/// A preference inferred from voice input, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceCandidate {
    pub kind: PreferenceKind,
    pub value: String,
    pub category: String,
    pub metadata: BTreeMap<String, String>,
}

impl PreferenceCandidate {
    /// Candidate as produced by the voice extractor: food category, tagged
    /// with its source.
    pub fn from_voice(kind: PreferenceKind, value: impl Into<String>) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), "voice".to_string());
        Self {
            kind,
            value: value.into(),
            category: "food".to_string(),
            metadata,
        }
    }
}
