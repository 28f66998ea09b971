//! Invitation domain types

use super::common::BaseRecord;
use serde::{Deserialize, Serialize};

/// A single-use code a user hands out to bring someone onto the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub code: String,
    pub consumed: bool,
    pub belongs_to_user: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationCreationInput {
    pub code: String,
    pub consumed: bool,
    pub belongs_to_user: u64,
}
