//! Diesel models for tags.

use diesel::prelude::*;

use crate::domain::tag::{NewTag as DomainNewTag, Tag as DomainTag};
use crate::domain::types::{TagId, TagName, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub color: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::tags)]
pub struct NewTag<'a> {
    pub name: &'a str,
    pub color: &'a str,
}

impl TryFrom<Tag> for DomainTag {
    type Error = TypeConstraintError;

    fn try_from(tag: Tag) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TagId::try_from(tag.id)?,
            name: TagName::new(tag.name)?,
            color: tag.color,
        })
    }
}

impl<'a> From<&'a DomainNewTag> for NewTag<'a> {
    fn from(tag: &'a DomainNewTag) -> Self {
        Self {
            name: tag.name.as_str(),
            color: tag.color.as_str(),
        }
    }
}
