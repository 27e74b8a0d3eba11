use diesel::prelude::*;

use crate::domain::tag::{NewTag, Tag};
use crate::models::tag::{NewTag as DbNewTag, Tag as DbTag};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, TagReader, TagWriter};

impl TagReader for DieselRepository {
    fn list_tags(&self) -> RepositoryResult<Vec<Tag>> {
        use crate::schema::tags;

        let mut conn = self.conn()?;

        tags::table
            .order(tags::name.asc())
            .select(DbTag::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(|tag| Tag::try_from(tag).map_err(RepositoryError::from))
            .collect()
    }
}

impl TagWriter for DieselRepository {
    fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag> {
        use crate::schema::tags;

        let mut conn = self.conn()?;

        let db_tag = diesel::insert_into(tags::table)
            .values(DbNewTag::from(new_tag))
            .returning(DbTag::as_returning())
            .get_result(&mut conn)
            .map_err(|err| match RepositoryError::from(err) {
                RepositoryError::ConstraintViolation(_) => RepositoryError::ValidationError(
                    format!("tag `{}` already exists", new_tag.name),
                ),
                other => other,
            })?;

        Ok(Tag::try_from(db_tag)?)
    }
}
