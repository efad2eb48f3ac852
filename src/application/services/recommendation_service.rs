use std::sync::Arc;

use serde::Deserialize;

use crate::application::ports::{
    LlmClient, LlmClientError, MenuSource, MenuSourceError, PreferenceRepository, RepositoryError,
};
use crate::domain::{MenuItem, Preference, UserId};

/// Ranks candidate menu items for a user by handing their stored
/// preferences and the menu to the generative model. No ranking happens
/// locally; this service only assembles the prompt and validates the
/// model's JSON.
pub struct RecommendationService<L>
where
    L: LlmClient,
{
    llm_client: Arc<L>,
    preferences: Arc<dyn PreferenceRepository>,
    menu_source: Arc<dyn MenuSource>,
    default_top_k: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankedItem {
    pub item: String,
    pub score: f32,
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("menu: {0}")]
    Menu(#[from] MenuSourceError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("generation: {0}")]
    Generation(#[from] LlmClientError),
    #[error("invalid ranking response: {0}")]
    InvalidResponse(String),
}

impl<L> RecommendationService<L>
where
    L: LlmClient,
{
    pub fn new(
        llm_client: Arc<L>,
        preferences: Arc<dyn PreferenceRepository>,
        menu_source: Arc<dyn MenuSource>,
        default_top_k: usize,
    ) -> Self {
        Self {
            llm_client,
            preferences,
            menu_source,
            default_top_k,
        }
    }

    pub async fn recommend(
        &self,
        user_id: &UserId,
        top_k: Option<usize>,
    ) -> Result<Vec<RankedItem>, RecommendationError> {
        let top_k = top_k.unwrap_or(self.default_top_k).max(1);

        let preferences = self.preferences.list_for_user(user_id).await?;
        let items = self.menu_source.list_items().await?;

        let prompt = build_ranking_prompt(&preferences, &items, top_k);

        tracing::debug!(
            preferences = preferences.len(),
            candidates = items.len(),
            top_k,
            "Requesting menu ranking"
        );

        let raw = self.llm_client.generate(&prompt).await?;

        let ranked: Vec<RankedItem> = serde_json::from_str(raw.trim())
            .map_err(|e| RecommendationError::InvalidResponse(e.to_string()))?;

        Ok(ranked)
    }
}

pub fn build_ranking_prompt(preferences: &[Preference], items: &[MenuItem], top_k: usize) -> String {
    let preference_lines = if preferences.is_empty() {
        "- none recorded".to_string()
    } else {
        preferences
            .iter()
            .map(|p| format!("- {}: {}", p.kind.as_str(), p.value))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let candidate_lines = items
        .iter()
        .map(|item| {
            let mut line = format!("- {} ({})", item.name, item.meal);
            if !item.tags.is_empty() {
                line.push_str(&format!(" tags: {}", item.tags.join(", ")));
            }
            if !item.allergens.is_empty() {
                line.push_str(&format!(" allergens: {}", item.allergens.join(", ")));
            }
            if let Some(calories) = item.calories {
                line.push_str(&format!(" ~{} kcal", calories));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a food recommendation assistant. Given the user's preferences and a set of \
candidate dishes, rank the top {top_k} best choices for this user and explain briefly why.

Rules:
- Never recommend an item whose allergens match one of the user's allergies.
- Respect dietary restrictions strictly; treat dislikes as strong negatives.
- Use ONLY the candidates listed below; do not invent items.

User preferences:
{preference_lines}

Candidates:
{candidate_lines}

Return ONLY a JSON array of objects with 'item', 'score' (0-1), and 'reason'."
    )
}
