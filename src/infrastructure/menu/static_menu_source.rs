use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{MenuSource, MenuSourceError};
use crate::domain::MenuItem;

/// In-memory menu provider. Items come from a JSON document or the
/// built-in demo menu; real deployments would swap this for a live feed.
pub struct StaticMenuSource {
    items: Vec<MenuItem>,
}

#[derive(Deserialize)]
struct MenuItemRecord {
    name: String,
    meal: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    allergens: Vec<String>,
    #[serde(default)]
    calories: Option<u32>,
}

impl StaticMenuSource {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    pub fn from_json(json: &str) -> Result<Self, MenuSourceError> {
        let records: Vec<MenuItemRecord> = serde_json::from_str(json)
            .map_err(|e| MenuSourceError::Unavailable(format!("invalid menu document: {}", e)))?;

        let items = records
            .into_iter()
            .map(|r| MenuItem {
                name: r.name,
                meal: r.meal,
                tags: r.tags,
                allergens: r.allergens,
                calories: r.calories,
            })
            .collect();

        Ok(Self { items })
    }

    pub fn demo() -> Self {
        let item = |name: &str, meal: &str, tags: &[&str], allergens: &[&str], calories: u32| {
            MenuItem {
                name: name.to_string(),
                meal: meal.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                allergens: allergens.iter().map(|a| a.to_string()).collect(),
                calories: Some(calories),
            }
        };

        Self::new(vec![
            item("Lentil curry", "dinner", &["vegan", "halal"], &[], 520),
            item("Grilled chicken wrap", "lunch", &["halal"], &["gluten"], 610),
            item("Margherita pizza", "dinner", &["vegetarian"], &["gluten", "dairy"], 740),
            item("Thai peanut noodles", "dinner", &[], &["peanuts", "soy", "gluten"], 680),
            item("Greek yogurt parfait", "breakfast", &["vegetarian"], &["dairy"], 320),
            item("Quinoa power bowl", "lunch", &["vegan", "gluten-free"], &[], 480),
            item("Salmon teriyaki", "dinner", &[], &["fish", "soy"], 590),
            item("Oatmeal with berries", "breakfast", &["vegan"], &["gluten"], 290),
        ])
    }
}

#[async_trait]
impl MenuSource for StaticMenuSource {
    async fn list_items(&self) -> Result<Vec<MenuItem>, MenuSourceError> {
        Ok(self.items.clone())
    }
}
