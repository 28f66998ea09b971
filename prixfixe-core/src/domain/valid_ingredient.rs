//! Valid ingredient catalog types

use super::common::BaseRecord;
use serde::{Deserialize, Serialize};

/// A reference ingredient shared by every user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidIngredient {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub name: String,
    pub variant: String,
    pub description: String,
    pub warning: String,
    pub contains_egg: bool,
    pub contains_dairy: bool,
    pub contains_peanut: bool,
    pub contains_tree_nut: bool,
    pub contains_soy: bool,
    pub contains_wheat: bool,
    pub contains_shellfish: bool,
    pub contains_sesame: bool,
    pub contains_fish: bool,
    pub contains_gluten: bool,
    pub animal_flesh: bool,
    pub animal_derived: bool,
    pub measurable_by_volume: bool,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidIngredientCreationInput {
    pub name: String,
    pub variant: String,
    pub description: String,
    pub warning: String,
    pub contains_egg: bool,
    pub contains_dairy: bool,
    pub contains_peanut: bool,
    pub contains_tree_nut: bool,
    pub contains_soy: bool,
    pub contains_wheat: bool,
    pub contains_shellfish: bool,
    pub contains_sesame: bool,
    pub contains_fish: bool,
    pub contains_gluten: bool,
    pub animal_flesh: bool,
    pub animal_derived: bool,
    pub measurable_by_volume: bool,
    pub icon: String,
}
