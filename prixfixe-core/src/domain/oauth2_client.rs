//! OAuth2 client domain types

use super::common::BaseRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Client {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub name: String,
    pub client_id: String,
    pub scopes: Vec<String>,
    pub redirect_uri: String,
    pub client_secret: String,
    pub belongs_to_user: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2ClientCreationInput {
    pub name: String,
    pub client_id: String,
    pub client_secret: String,
    pub scopes: Vec<String>,
    pub redirect_uri: String,
    pub belongs_to_user: u64,
}

/// Scope sets are stored as one comma-joined column.
pub fn join_scopes(scopes: &[String]) -> String {
    scopes.join(",")
}

/// Inverse of [`join_scopes`]; an empty column is an empty set.
pub fn split_scopes(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(str::to_string).collect()
}
