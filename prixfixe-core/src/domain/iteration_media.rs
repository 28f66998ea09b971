//! Photos and other media captured during a recipe iteration

use super::common::BaseRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationMedia {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub path: String,
    pub mimetype: String,
    pub recipe_iteration_id: u64,
    pub recipe_step_id: Option<u64>,
    pub belongs_to_recipe_iteration: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationMediaCreationInput {
    pub path: String,
    pub mimetype: String,
    pub recipe_iteration_id: u64,
    pub recipe_step_id: Option<u64>,
    pub belongs_to_recipe_iteration: u64,
}
