//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::client::{Client, ClientListQuery, NewClient, UpdateClient};
use crate::domain::stage::{NewStage, Stage};
use crate::domain::tag::{NewTag, Tag};
use crate::domain::types::{ClientId, StageId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ClientReader, ClientWriter, StageReader, StageWriter, TagReader, TagWriter,
};

mock! {
    pub Repository {}

    impl StageReader for Repository {
        fn list_stages(&self) -> RepositoryResult<Vec<Stage>>;
    }

    impl StageWriter for Repository {
        fn create_stage(&self, new_stage: &NewStage) -> RepositoryResult<Stage>;
    }

    impl TagReader for Repository {
        fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
    }

    impl TagWriter for Repository {
        fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
    }

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<Vec<Client>>;
    }

    impl ClientWriter for Repository {
        fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
        fn change_stage(&self, client_id: ClientId, stage_id: StageId) -> RepositoryResult<Client>;
        fn update_client(
            &self,
            client_id: ClientId,
            updates: &UpdateClient,
        ) -> RepositoryResult<Client>;
        fn soft_delete_client(&self, client_id: ClientId) -> RepositoryResult<Client>;
        fn restore_client(&self, client_id: ClientId) -> RepositoryResult<Client>;
        fn permanent_delete_client(&self, client_id: ClientId) -> RepositoryResult<()>;
    }
}
