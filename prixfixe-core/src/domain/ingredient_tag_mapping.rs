//! Tags attached to valid ingredients

use super::common::BaseRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientTagMapping {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub valid_ingredient_tag_id: u64,
    pub belongs_to_valid_ingredient: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientTagMappingCreationInput {
    pub valid_ingredient_tag_id: u64,
    pub belongs_to_valid_ingredient: u64,
}
