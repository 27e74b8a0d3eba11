//! Tag catalog administration.

use crate::domain::tag::{NewTag, Tag};
use crate::repository::{TagReader, TagWriter};
use crate::services::ServiceResult;
use crate::services::store::RecordStore;

/// Creates a tag and adds it to the cached tag table once the record store
/// accepted it. Names are unique.
pub fn create_tag<R>(repo: &R, store: &mut RecordStore, new_tag: &NewTag) -> ServiceResult<Tag>
where
    R: TagWriter + ?Sized,
{
    let tag = repo.create_tag(new_tag).map_err(|err| {
        log::error!("Failed to create tag `{}`: {err}", new_tag.name);
        err
    })?;

    store.apply_tag_created(tag.clone());
    log::info!("Created tag `{}` ({})", tag.name, tag.id);
    Ok(tag)
}

/// Returns the tag table, loading it when nothing is cached yet.
pub fn list_tags<'a, R>(repo: &R, store: &'a mut RecordStore) -> ServiceResult<&'a [Tag]>
where
    R: TagReader + ?Sized,
{
    if store.tags().is_empty() {
        store.load_tags(repo)?;
    }
    Ok(store.tags())
}
