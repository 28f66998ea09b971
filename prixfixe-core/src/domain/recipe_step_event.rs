use super::common::BaseRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStepEvent {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub event_type: String,
    pub done: bool,
    pub recipe_iteration_id: u64,
    pub recipe_step_id: u64,
    pub belongs_to_recipe_step: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStepEventCreationInput {
    pub event_type: String,
    pub done: bool,
    pub recipe_iteration_id: u64,
    pub recipe_step_id: u64,
    pub belongs_to_recipe_step: u64,
}
