use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::filter::{ClientFilter, DateFilter};
use crate::domain::types::{Priority, TagId};
use crate::forms::FormError;
use crate::services::store::RecordStore;

/// Query string shared by the board, list and export endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub search: Option<String>,
    /// Comma separated tag names.
    pub tags: Option<String>,
    pub priority: Option<String>,
    /// `all`, `today`, `week`, `month` or `custom`.
    pub date: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub trash: bool,
}

impl FilterQuery {
    /// Parses the priority; empty or `all` means no restriction.
    pub fn priority(&self) -> Result<Option<Priority>, FormError> {
        match self.priority.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
            Some(value) => Ok(Some(value.parse()?)),
        }
    }

    fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Builds the client filter, resolving tag names against the cached tags.
    pub fn to_filter(&self, store: &RecordStore) -> Result<ClientFilter, FormError> {
        let tags = self
            .tag_names()
            .map(|name| {
                store
                    .tag_by_name(name)
                    .map(|tag| tag.id)
                    .ok_or_else(|| FormError::UnknownTag(name.to_string()))
            })
            .collect::<Result<Vec<TagId>, _>>()?;

        let kind = self.date.as_deref().unwrap_or_default();
        let date = DateFilter::from_parts(kind, self.start, self.end)?;

        Ok(ClientFilter {
            search: self.search.clone().unwrap_or_default(),
            selected_tags: tags.into_iter().collect(),
            priority: self.priority()?,
            date,
        })
    }
}
