use super::common::BaseRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub name: String,
    pub variant: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentCreationInput {
    pub name: String,
    pub variant: String,
    pub description: String,
    pub icon: String,
}
