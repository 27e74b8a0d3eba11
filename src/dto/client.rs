use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::client::{Client, Contact, Lifecycle};
use crate::domain::types::{ClientId, Priority, StageId};
use crate::services::store::RecordStore;

/// A client with its stage and tags resolved against the record store cache.
#[derive(Debug, Serialize)]
pub struct ClientView<'a> {
    pub id: ClientId,
    pub name: &'a str,
    pub company_name: Option<&'a str>,
    pub stage_id: StageId,
    pub stage: Option<&'a str>,
    pub priority: Priority,
    pub tags: Vec<&'a str>,
    pub contacts: &'a [Contact],
    pub notes: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub lifecycle: Lifecycle,
    pub deleted_at: Option<NaiveDateTime>,
}

impl<'a> ClientView<'a> {
    pub fn new(store: &'a RecordStore, client: &'a Client) -> Self {
        Self {
            id: client.id,
            name: client.name.as_str(),
            company_name: client.company_name.as_deref(),
            stage_id: client.stage_id,
            stage: store.stage(client.stage_id).map(|s| s.name.as_str()),
            priority: client.priority,
            tags: store.tag_names(client),
            contacts: &client.contacts,
            notes: client.notes.as_deref(),
            created_at: client.created_at,
            lifecycle: client.lifecycle(),
            deleted_at: client.deleted_at,
        }
    }
}

pub fn client_views<'a>(store: &'a RecordStore, clients: &[&'a Client]) -> Vec<ClientView<'a>> {
    clients.iter().map(|c| ClientView::new(store, c)).collect()
}
