/// A candidate dish offered to the recommendation ranker. Sourced from an
/// external menu provider; the backend never invents items.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub name: String,
    pub meal: String,
    pub tags: Vec<String>,
    pub allergens: Vec<String>,
    pub calories: Option<u32>,
}
