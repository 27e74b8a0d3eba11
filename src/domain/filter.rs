//! Criteria narrowing the visible client list.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Priority, TagId, TypeConstraintError};

/// Creation-date window applied to clients.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum DateFilter {
    #[default]
    All,
    /// From the start of the current local day until now.
    Today,
    /// The last seven days, measured back from now.
    Week,
    /// From the first day of the current month until now.
    Month,
    /// Whole days from `start` through `end`. A missing `end` means "until
    /// now", a missing `start` leaves the window open to the past.
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl DateFilter {
    /// Builds a filter from its textual kind and optional custom bounds.
    pub fn from_parts(
        kind: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, TypeConstraintError> {
        match kind.trim().to_lowercase().as_str() {
            "" | "all" => Ok(DateFilter::All),
            "today" => Ok(DateFilter::Today),
            "week" => Ok(DateFilter::Week),
            "month" => Ok(DateFilter::Month),
            "custom" => Ok(DateFilter::Custom { start, end }),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown date filter `{other}`"
            ))),
        }
    }
}

/// Active filter criteria combined with AND semantics.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientFilter {
    /// Case-insensitive substring matched against name and company name.
    pub search: String,
    /// A client matches when it carries any of these tags. Empty disables the
    /// tag predicate.
    pub selected_tags: BTreeSet<TagId>,
    /// `None` stands for "all priorities".
    pub priority: Option<Priority>,
    pub date: DateFilter,
}

impl ClientFilter {
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn tags(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.selected_tags = tags.into_iter().collect();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn date(mut self, date: DateFilter) -> Self {
        self.date = date;
        self
    }

    /// Returns `true` when no predicate narrows the list.
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.selected_tags.is_empty()
            && self.priority.is_none()
            && self.date == DateFilter::All
    }
}
