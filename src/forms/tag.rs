use serde::Deserialize;
use validator::Validate;

use crate::domain::tag::NewTag;
use crate::domain::types::TagName;
use crate::forms::FormError;

#[derive(Deserialize, Validate)]
pub struct CreateTagForm {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    /// CSS color used when rendering the tag.
    #[serde(default)]
    #[validate(length(max = 32))]
    pub color: String,
}

impl CreateTagForm {
    pub fn to_new_tag(&self) -> Result<NewTag, FormError> {
        self.validate()?;
        let name = TagName::new(&self.name)?;
        Ok(NewTag::new(name, self.color.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_name_and_color() {
        let form = CreateTagForm {
            name: "  vip ".to_string(),
            color: " #f00 ".to_string(),
        };
        let new_tag = form.to_new_tag().unwrap();
        assert_eq!(new_tag.name.as_str(), "vip");
        assert_eq!(new_tag.color, "#f00");
    }

    #[test]
    fn blank_name_is_rejected() {
        let form = CreateTagForm {
            name: "   ".to_string(),
            color: String::new(),
        };
        assert!(matches!(form.to_new_tag(), Err(FormError::Constraint(_))));
    }
}
