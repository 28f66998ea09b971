//! Common types for domain models

use serde::{Deserialize, Serialize};

/// Identity and lifecycle fields every persisted record carries.
///
/// Timestamps are unix epoch seconds assigned by the database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRecord {
    pub id: u64,
    pub created_on: u64,
    pub last_updated_on: Option<u64>,
    pub archived_on: Option<u64>,
}

impl BaseRecord {
    pub fn is_archived(&self) -> bool {
        self.archived_on.is_some()
    }
}
