use serde::Deserialize;
use validator::Validate;

use crate::domain::types::StageId;
use crate::forms::FormError;

#[derive(Deserialize, Validate)]
/// Body of a single stage move, the drop target of a dragged card.
pub struct ChangeStageForm {
    #[validate(range(min = 1))]
    pub stage_id: i32,
}

impl ChangeStageForm {
    pub fn stage_id(&self) -> Result<StageId, FormError> {
        self.validate()?;
        StageId::new(self.stage_id).map_err(|_| FormError::InvalidStageId)
    }
}

#[derive(Debug, Default, Deserialize)]
/// Body of destructive requests. A missing flag counts as declined.
pub struct ConfirmForm {
    #[serde(default)]
    pub confirm: bool,
}
