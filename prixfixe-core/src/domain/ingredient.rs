//! Ingredient catalog types

use super::common::BaseRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
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
    /// Kept on hand in most kitchens
    pub considered_staple: bool,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientCreationInput {
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
    pub considered_staple: bool,
    pub icon: String,
}
