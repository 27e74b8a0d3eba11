use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{ClientId, StageId};
use crate::forms::FormError;

fn client_ids(raw: &[i32]) -> Result<Vec<ClientId>, FormError> {
    raw.iter()
        .map(|id| ClientId::new(*id).map_err(|_| FormError::InvalidClientId))
        .collect()
}

#[derive(Deserialize, Validate)]
pub struct BulkStageForm {
    #[validate(length(min = 1))]
    pub client_ids: Vec<i32>,
    #[validate(range(min = 1))]
    pub stage_id: i32,
}

impl BulkStageForm {
    pub fn parse(&self) -> Result<(Vec<ClientId>, StageId), FormError> {
        self.validate()?;
        let stage_id = StageId::new(self.stage_id).map_err(|_| FormError::InvalidStageId)?;
        Ok((client_ids(&self.client_ids)?, stage_id))
    }
}

#[derive(Deserialize, Validate)]
pub struct BulkTagForm {
    #[validate(length(min = 1))]
    pub client_ids: Vec<i32>,
    /// Tag name; resolved against the cached tag table.
    #[validate(length(min = 1))]
    pub tag: String,
}

impl BulkTagForm {
    pub fn parse(&self) -> Result<Vec<ClientId>, FormError> {
        self.validate()?;
        client_ids(&self.client_ids)
    }
}

#[derive(Deserialize, Validate)]
pub struct BulkTrashForm {
    #[validate(length(min = 1))]
    pub client_ids: Vec<i32>,
    #[serde(default)]
    pub confirm: bool,
}

impl BulkTrashForm {
    pub fn parse(&self) -> Result<Vec<ClientId>, FormError> {
        self.validate()?;
        client_ids(&self.client_ids)
    }
}
