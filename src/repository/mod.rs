//! Access to the record store holding stages, tags and clients.
//!
//! The traits describe the remote contract the pipeline services depend on;
//! [`DieselRepository`] implements them over SQLite.

use crate::db::{DbConnection, DbPool};
use crate::domain::client::{Client, ClientListQuery, NewClient, UpdateClient};
use crate::domain::stage::{NewStage, Stage};
use crate::domain::tag::{NewTag, Tag};
use crate::domain::types::{ClientId, StageId};
use crate::repository::errors::RepositoryResult;

pub mod client;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod stage;
pub mod tag;

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

pub trait StageReader {
    /// Returns all stages ordered by position.
    fn list_stages(&self) -> RepositoryResult<Vec<Stage>>;
}

pub trait StageWriter {
    fn create_stage(&self, new_stage: &NewStage) -> RepositoryResult<Stage>;
}

pub trait TagReader {
    fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
}

pub trait TagWriter {
    fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
}

pub trait ClientReader {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
    /// Lists clients matching the server-side filter, oldest first.
    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<Vec<Client>>;
}

pub trait ClientWriter {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    fn change_stage(&self, client_id: ClientId, stage_id: StageId) -> RepositoryResult<Client>;
    fn update_client(&self, client_id: ClientId, updates: &UpdateClient)
    -> RepositoryResult<Client>;
    fn soft_delete_client(&self, client_id: ClientId) -> RepositoryResult<Client>;
    fn restore_client(&self, client_id: ClientId) -> RepositoryResult<Client>;
    /// Irreversibly removes a trashed client together with its tags and contacts.
    fn permanent_delete_client(&self, client_id: ClientId) -> RepositoryResult<()>;
}
