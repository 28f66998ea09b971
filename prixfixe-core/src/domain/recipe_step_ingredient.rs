//! Ingredients consumed by a recipe step

use super::common::BaseRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeStepIngredient {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub ingredient_id: Option<u64>,
    pub quantity_type: String,
    pub quantity_value: f32,
    pub quantity_notes: String,
    /// The ingredient is the output of another recipe
    pub product_of_recipe: bool,
    pub ingredient_notes: String,
    pub belongs_to_recipe_step: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeStepIngredientCreationInput {
    pub ingredient_id: Option<u64>,
    pub quantity_type: String,
    pub quantity_value: f32,
    pub quantity_notes: String,
    pub product_of_recipe: bool,
    pub ingredient_notes: String,
    pub belongs_to_recipe_step: u64,
}
