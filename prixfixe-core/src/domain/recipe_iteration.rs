//! A single attempt at cooking a recipe, with its ratings

use super::common::BaseRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeIteration {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub recipe_id: u64,
    pub end_difficulty_rating: f32,
    pub end_complexity_rating: f32,
    pub end_taste_rating: f32,
    pub end_overall_rating: f32,
    pub belongs_to_recipe: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeIterationCreationInput {
    pub recipe_id: u64,
    pub end_difficulty_rating: f32,
    pub end_complexity_rating: f32,
    pub end_taste_rating: f32,
    pub end_overall_rating: f32,
    pub belongs_to_recipe: u64,
}
