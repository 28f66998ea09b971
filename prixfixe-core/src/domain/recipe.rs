//! Recipe domain types

use super::common::BaseRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub name: String,
    pub source: String,
    pub description: String,
    pub inspired_by_recipe_id: Option<u64>,
    pub belongs_to_user: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeCreationInput {
    pub name: String,
    pub source: String,
    pub description: String,
    pub inspired_by_recipe_id: Option<u64>,
    pub belongs_to_user: u64,
}
