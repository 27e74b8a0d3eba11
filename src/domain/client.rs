use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ClientId, ClientName, ContactEmail, Priority, StageId, TagId, normalize_optional,
    sanitize_notes,
};

/// Person reachable at a client company.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub email: Option<ContactEmail>,
    pub phone: Option<String>,
    pub is_primary: bool,
}

impl Contact {
    #[must_use]
    pub fn new(
        name: String,
        email: Option<ContactEmail>,
        phone: Option<String>,
        is_primary: bool,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            email,
            phone: normalize_optional(phone),
            is_primary,
        }
    }
}

/// Where a loaded client sits in its soft-delete lifecycle. Permanently
/// deleted clients are no longer loadable.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Active,
    Trashed,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub name: ClientName,
    pub company_name: Option<String>,
    pub stage_id: StageId,
    pub priority: Priority,
    pub tags: BTreeSet<TagId>,
    pub contacts: Vec<Contact>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub is_deleted: bool,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Client {
    pub fn lifecycle(&self) -> Lifecycle {
        if self.is_deleted {
            Lifecycle::Trashed
        } else {
            Lifecycle::Active
        }
    }

    pub fn has_tag(&self, tag: TagId) -> bool {
        self.tags.contains(&tag)
    }

    /// Returns the contact flagged primary, falling back to the first one.
    pub fn primary_contact(&self) -> Option<&Contact> {
        self.contacts
            .iter()
            .find(|c| c.is_primary)
            .or_else(|| self.contacts.first())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewClient {
    pub name: ClientName,
    pub company_name: Option<String>,
    /// Stage to create the client in. The record store rejects `None`.
    pub stage_id: Option<StageId>,
    pub priority: Priority,
    pub tags: BTreeSet<TagId>,
    pub contacts: Vec<Contact>,
    pub notes: Option<String>,
}

impl NewClient {
    #[must_use]
    pub fn new(
        name: ClientName,
        company_name: Option<String>,
        stage_id: Option<StageId>,
        priority: Priority,
        notes: Option<String>,
    ) -> Self {
        Self {
            name,
            company_name: normalize_optional(company_name),
            stage_id,
            priority,
            tags: BTreeSet::new(),
            contacts: Vec::new(),
            notes: sanitize_notes(notes),
        }
    }

    #[must_use]
    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contacts.push(contact);
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.tags.extend(tags);
        self
    }
}

/// Partial update of a client. `None` leaves the field untouched; for nullable
/// columns `Some(None)` clears the value.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct UpdateClient {
    pub name: Option<ClientName>,
    pub company_name: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub notes: Option<Option<String>>,
    /// Replaces the whole tag set.
    pub tags: Option<BTreeSet<TagId>>,
    /// Replaces the whole contact list.
    pub contacts: Option<Vec<Contact>>,
}

impl UpdateClient {
    #[must_use]
    pub fn name(mut self, name: ClientName) -> Self {
        self.name = Some(name);
        self
    }

    #[must_use]
    pub fn company_name(mut self, company_name: Option<String>) -> Self {
        self.company_name = Some(normalize_optional(company_name));
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = Some(sanitize_notes(notes));
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: BTreeSet<TagId>) -> Self {
        self.tags = Some(tags);
        self
    }

    #[must_use]
    pub fn contacts(mut self, contacts: Vec<Contact>) -> Self {
        self.contacts = Some(contacts);
        self
    }
}

/// Server-side filter applied when loading the client list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClientListQuery {
    pub is_deleted: bool,
    pub priority: Option<Priority>,
}

impl ClientListQuery {
    pub fn active() -> Self {
        Self::default()
    }

    pub fn trashed() -> Self {
        Self {
            is_deleted: true,
            priority: None,
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Returns `true` when the client would be part of this query's result set.
    pub fn matches(&self, client: &Client) -> bool {
        client.is_deleted == self.is_deleted
            && self.priority.is_none_or(|p| p == client.priority)
    }
}
