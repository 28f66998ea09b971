//! Recipe step domain types

use super::common::BaseRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStep {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub index: u64,
    pub preparation_id: u64,
    pub prerequisite_step: u64,
    pub min_estimated_time_in_seconds: u64,
    pub max_estimated_time_in_seconds: u64,
    pub temperature_in_celsius: Option<u64>,
    pub notes: String,
    pub recipe_id: u64,
    pub belongs_to_recipe: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStepCreationInput {
    pub index: u64,
    pub preparation_id: u64,
    pub prerequisite_step: u64,
    pub min_estimated_time_in_seconds: u64,
    pub max_estimated_time_in_seconds: u64,
    pub temperature_in_celsius: Option<u64>,
    pub notes: String,
    pub recipe_id: u64,
    pub belongs_to_recipe: u64,
}
