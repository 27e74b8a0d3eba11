//! In-memory mirror of the record store's stages, tags and clients.
//!
//! The cache only changes through `load*`/`refresh` or through the `apply*`
//! methods, which callers invoke after the record store confirmed a mutation.

use serde::Serialize;

use crate::domain::client::{Client, ClientListQuery};
use crate::domain::stage::Stage;
use crate::domain::tag::Tag;
use crate::domain::types::{ClientId, StageId, TagId};
use crate::repository::{ClientReader, StageReader, TagReader};
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    stages: Vec<Stage>,
    tags: Vec<Tag>,
    clients: Vec<Client>,
    query: ClientListQuery,
}

/// Kanban column: a stage with the visible clients sitting in it.
#[derive(Debug, Serialize)]
pub struct StageColumn<'a> {
    pub stage: &'a Stage,
    pub clients: Vec<&'a Client>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from already fetched records.
    pub fn with_records(
        mut stages: Vec<Stage>,
        tags: Vec<Tag>,
        clients: Vec<Client>,
        query: ClientListQuery,
    ) -> Self {
        stages.sort_by_key(|s| (s.position, s.id));
        Self {
            stages,
            tags,
            clients,
            query,
        }
    }

    pub fn load_stages<R>(&mut self, repo: &R) -> ServiceResult<()>
    where
        R: StageReader + ?Sized,
    {
        let mut stages = repo.list_stages().map_err(|err| {
            log::error!("Failed to load stages: {err}");
            ServiceError::Fetch(err.to_string())
        })?;
        stages.sort_by_key(|s| (s.position, s.id));
        self.stages = stages;
        Ok(())
    }

    pub fn load_tags<R>(&mut self, repo: &R) -> ServiceResult<()>
    where
        R: TagReader + ?Sized,
    {
        self.tags = repo.list_tags().map_err(|err| {
            log::error!("Failed to load tags: {err}");
            ServiceError::Fetch(err.to_string())
        })?;
        Ok(())
    }

    /// Replaces the cached clients with the record store's result for `query`.
    /// On failure the previous cache is kept untouched.
    pub fn load<R>(&mut self, repo: &R, query: ClientListQuery) -> ServiceResult<()>
    where
        R: ClientReader + ?Sized,
    {
        let clients = repo.list_clients(query).map_err(|err| {
            log::error!("Failed to load clients: {err}");
            ServiceError::Fetch(err.to_string())
        })?;
        self.clients = clients;
        self.query = query;
        Ok(())
    }

    /// Reloads stages, tags and clients. Stops at the first failing fetch.
    pub fn refresh<R>(&mut self, repo: &R, query: ClientListQuery) -> ServiceResult<()>
    where
        R: StageReader + TagReader + ClientReader + ?Sized,
    {
        self.load_stages(repo)?;
        self.load_tags(repo)?;
        self.load(repo, query)
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    /// Server-side filter the cached clients were loaded with.
    pub fn query(&self) -> ClientListQuery {
        self.query
    }

    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn stage(&self, id: StageId) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == id)
    }

    /// Default stage for newly imported clients.
    pub fn first_stage(&self) -> Option<&Stage> {
        self.stages.first()
    }

    pub fn tag(&self, id: TagId) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    pub fn tag_by_name(&self, name: &str) -> Option<&Tag> {
        let name = name.trim();
        self.tags.iter().find(|t| t.name.as_str() == name)
    }

    /// Resolves the client's tag ids to names, in name order. Ids missing from
    /// the tag table are skipped.
    pub fn tag_names(&self, client: &Client) -> Vec<&str> {
        let mut names: Vec<&str> = client
            .tags
            .iter()
            .filter_map(|id| self.tag(*id))
            .map(|t| t.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Stores a tag the record store just created, keeping name order.
    pub fn apply_tag_created(&mut self, tag: Tag) {
        self.tags.retain(|t| t.id != tag.id);
        let index = self.tags.partition_point(|t| t.name < tag.name);
        self.tags.insert(index, tag);
    }

    /// Moves the cached client to `stage_id`. Returns `false` when the client
    /// is not cached.
    pub fn apply_stage_change(&mut self, client_id: ClientId, stage_id: StageId) -> bool {
        match self.clients.iter_mut().find(|c| c.id == client_id) {
            Some(client) => {
                client.stage_id = stage_id;
                true
            }
            None => false,
        }
    }

    /// Adds `tag` to the cached client. Idempotent; returns `true` only when
    /// the tag set changed.
    pub fn apply_tag_add(&mut self, client_id: ClientId, tag: TagId) -> bool {
        self.clients
            .iter_mut()
            .find(|c| c.id == client_id)
            .is_some_and(|client| client.tags.insert(tag))
    }

    pub fn remove_from_cache(&mut self, client_id: ClientId) -> Option<Client> {
        let index = self.clients.iter().position(|c| c.id == client_id)?;
        Some(self.clients.remove(index))
    }

    /// Stores a record confirmed by the record store: replaces or appends it
    /// when it matches the loaded query, drops it otherwise.
    pub fn apply_confirmed(&mut self, client: Client) {
        let position = self.clients.iter().position(|c| c.id == client.id);
        match (self.query.matches(&client), position) {
            (true, Some(index)) => self.clients[index] = client,
            (true, None) => self.clients.push(client),
            (false, Some(index)) => {
                self.clients.remove(index);
            }
            (false, None) => {}
        }
    }

    /// Groups `visible` clients into stage columns, in stage order.
    pub fn board<'a>(&'a self, visible: &[&'a Client]) -> Vec<StageColumn<'a>> {
        self.stages
            .iter()
            .map(|stage| StageColumn {
                stage,
                clients: visible
                    .iter()
                    .copied()
                    .filter(|c| c.stage_id == stage.id)
                    .collect(),
            })
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{client, stage, tag};
    use super::*;

    fn store() -> RecordStore {
        RecordStore::with_records(
            vec![stage(2, "Won", 1), stage(1, "Lead", 0)],
            vec![tag(1, "vip"), tag(2, "cold")],
            vec![client(1, "Acme", 1), client(2, "Globex", 2)],
            ClientListQuery::active(),
        )
    }

    fn id(value: i32) -> ClientId {
        ClientId::new(value).unwrap()
    }

    #[test]
    fn stages_are_kept_in_position_order() {
        let store = store();
        assert_eq!(store.first_stage().unwrap().name.as_str(), "Lead");
    }

    #[test]
    fn apply_tag_add_is_idempotent() {
        let mut store = store();
        let vip = TagId::new(1).unwrap();
        assert!(store.apply_tag_add(id(1), vip));
        assert!(!store.apply_tag_add(id(1), vip));
        assert_eq!(store.client(id(1)).unwrap().tags.len(), 1);
        assert_eq!(store.tag_names(store.client(id(1)).unwrap()), vec!["vip"]);
    }

    #[test]
    fn apply_confirmed_drops_records_leaving_the_query() {
        let mut store = store();
        let mut trashed = store.client(id(1)).unwrap().clone();
        trashed.is_deleted = true;

        store.apply_confirmed(trashed);

        assert!(store.client(id(1)).is_none());
        assert_eq!(store.clients().len(), 1);
    }

    #[test]
    fn apply_confirmed_inserts_matching_records() {
        let mut store = store();
        store.apply_confirmed(client(3, "Initech", 1));
        assert!(store.client(id(3)).is_some());
    }

    #[test]
    fn board_groups_clients_by_stage() {
        let store = store();
        let visible: Vec<&Client> = store.clients().iter().collect();
        let board = store.board(&visible);

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].stage.name.as_str(), "Lead");
        assert_eq!(board[0].clients[0].name.as_str(), "Acme");
        assert_eq!(board[1].clients[0].name.as_str(), "Globex");
    }

    #[test]
    fn created_tags_are_kept_in_name_order() {
        let mut store = store();
        store.apply_tag_created(tag(3, "hot"));
        let names: Vec<&str> = store.tags().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["cold", "hot", "vip"]);
        assert_eq!(store.tag_by_name("hot").unwrap().id, TagId::new(3).unwrap());
    }

    #[test]
    fn remove_from_cache_returns_record() {
        let mut store = store();
        assert!(store.remove_from_cache(id(2)).is_some());
        assert!(store.remove_from_cache(id(2)).is_none());
    }
}
