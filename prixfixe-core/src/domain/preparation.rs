use super::common::BaseRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preparation {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub name: String,
    pub variant: String,
    pub description: String,
    pub allergy_warning: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparationCreationInput {
    pub name: String,
    pub variant: String,
    pub description: String,
    pub allergy_warning: String,
    pub icon: String,
}
