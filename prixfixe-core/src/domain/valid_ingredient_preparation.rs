//! Preparations known to apply to a valid ingredient

use super::common::BaseRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidIngredientPreparation {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub notes: String,
    pub valid_preparation_id: u64,
    pub belongs_to_valid_ingredient: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidIngredientPreparationCreationInput {
    pub notes: String,
    pub valid_preparation_id: u64,
    pub belongs_to_valid_ingredient: u64,
}
