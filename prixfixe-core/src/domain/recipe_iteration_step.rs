use super::common::BaseRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIterationStep {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub started_on: Option<u64>,
    pub ended_on: Option<u64>,
    /// Free-form; no set of states is enforced.
    pub state: String,
    pub belongs_to_recipe: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIterationStepCreationInput {
    pub started_on: Option<u64>,
    pub ended_on: Option<u64>,
    pub state: String,
    pub belongs_to_recipe: u64,
}
