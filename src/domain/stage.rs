//! Ordered workflow stages a client moves through.

use serde::{Deserialize, Serialize};

use crate::domain::types::{StageId, StageName};

/// A pipeline column. Stages are ordered by `position`; the first stage is the
/// default target for imported clients.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stage {
    pub id: StageId,
    pub name: StageName,
    /// Display glyph shown in the column header.
    pub icon: String,
    pub color: String,
    pub position: i32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewStage {
    pub name: StageName,
    pub icon: String,
    pub color: String,
    pub position: i32,
}

impl NewStage {
    #[must_use]
    pub fn new(name: StageName, icon: String, color: String, position: i32) -> Self {
        Self {
            name,
            icon: icon.trim().to_string(),
            color: color.trim().to_string(),
            position,
        }
    }
}
