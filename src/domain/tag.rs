//! Tags used to classify clients.

use serde::{Deserialize, Serialize};

use crate::domain::types::{TagId, TagName};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    /// Unique across all tags.
    pub name: TagName,
    pub color: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewTag {
    pub name: TagName,
    pub color: String,
}

impl NewTag {
    #[must_use]
    pub fn new(name: TagName, color: String) -> Self {
        Self {
            name,
            color: color.trim().to_string(),
        }
    }
}
