//! Diesel models for clients, their tag links and contacts.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::client::{
    Client as DomainClient, Contact as DomainContact, NewClient as DomainNewClient,
    UpdateClient as DomainUpdateClient,
};
use crate::domain::types::{
    ClientId, ClientName, ContactEmail, Priority, StageId, TagId, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::clients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::client::Client`].
pub struct Client {
    pub id: i32,
    pub name: String,
    pub company_name: Option<String>,
    pub stage_id: i32,
    pub priority: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_deleted: bool,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clients)]
/// Insertable form of [`Client`].
pub struct NewClient<'a> {
    pub name: &'a str,
    pub company_name: Option<&'a str>,
    pub stage_id: i32,
    pub priority: &'a str,
    pub notes: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_deleted: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
/// Scalar columns touched by a [`DomainUpdateClient`]. `updated_at` is always
/// set so the changeset is never empty.
pub struct UpdateClient<'a> {
    pub name: Option<&'a str>,
    pub company_name: Option<Option<&'a str>>,
    pub priority: Option<&'a str>,
    pub notes: Option<Option<&'a str>>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations, Insertable)]
#[diesel(table_name = crate::schema::client_tags)]
#[diesel(belongs_to(Client, foreign_key = client_id))]
#[diesel(primary_key(client_id, tag_id))]
pub struct ClientTag {
    pub client_id: i32,
    pub tag_id: i32,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::client_contacts)]
#[diesel(belongs_to(Client, foreign_key = client_id))]
pub struct ClientContact {
    pub id: i32,
    pub client_id: i32,
    pub position: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_primary: bool,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::client_contacts)]
pub struct NewClientContact<'a> {
    pub client_id: i32,
    pub position: i32,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub is_primary: bool,
}

impl Client {
    /// Assembles the domain aggregate from the client row and its child rows.
    pub fn into_domain(
        self,
        tags: Vec<ClientTag>,
        mut contacts: Vec<ClientContact>,
    ) -> Result<DomainClient, TypeConstraintError> {
        contacts.sort_by_key(|c| c.position);

        Ok(DomainClient {
            id: ClientId::try_from(self.id)?,
            name: ClientName::new(self.name)?,
            company_name: self.company_name,
            stage_id: StageId::try_from(self.stage_id)?,
            priority: self.priority.parse::<Priority>()?,
            tags: tags
                .into_iter()
                .map(|t| TagId::try_from(t.tag_id))
                .collect::<Result<_, _>>()?,
            contacts: contacts
                .into_iter()
                .map(DomainContact::try_from)
                .collect::<Result<_, _>>()?,
            notes: self.notes,
            created_at: self.created_at,
            is_deleted: self.is_deleted,
            deleted_at: self.deleted_at,
        })
    }
}

impl TryFrom<ClientContact> for DomainContact {
    type Error = TypeConstraintError;

    fn try_from(contact: ClientContact) -> Result<Self, Self::Error> {
        Ok(Self {
            name: contact.name,
            email: contact.email.map(ContactEmail::new).transpose()?,
            phone: contact.phone,
            is_primary: contact.is_primary,
        })
    }
}

impl<'a> NewClient<'a> {
    /// Builds the insertable row for a client placed in `stage_id`.
    pub fn from_domain(client: &'a DomainNewClient, stage_id: StageId, now: NaiveDateTime) -> Self {
        Self {
            name: client.name.as_str(),
            company_name: client.company_name.as_deref(),
            stage_id: stage_id.get(),
            priority: client.priority.as_str(),
            notes: client.notes.as_deref(),
            created_at: now,
            updated_at: now,
            is_deleted: false,
        }
    }
}

impl<'a> UpdateClient<'a> {
    pub fn from_domain(updates: &'a DomainUpdateClient, now: NaiveDateTime) -> Self {
        Self {
            name: updates.name.as_ref().map(|n| n.as_str()),
            company_name: updates.company_name.as_ref().map(|c| c.as_deref()),
            priority: updates.priority.map(Priority::as_str),
            notes: updates.notes.as_ref().map(|n| n.as_deref()),
            updated_at: now,
        }
    }
}

impl<'a> NewClientContact<'a> {
    pub fn from_domain(client_id: ClientId, position: usize, contact: &'a DomainContact) -> Self {
        Self {
            client_id: client_id.get(),
            position: i32::try_from(position).unwrap_or(i32::MAX),
            name: contact.name.as_str(),
            email: contact.email.as_ref().map(ContactEmail::as_str),
            phone: contact.phone.as_deref(),
            is_primary: contact.is_primary,
        }
    }
}
