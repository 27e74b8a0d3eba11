#![allow(dead_code)]

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_pipeline::db::{DbPool, establish_connection_pool};
use pushkind_pipeline::domain::client::{Client, NewClient};
use pushkind_pipeline::domain::tag::{NewTag, Tag};
use pushkind_pipeline::domain::types::{ClientName, Priority, StageId, TagName};
use pushkind_pipeline::repository::{ClientWriter, DieselRepository, TagWriter};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// A migrated SQLite database living in its own temporary directory.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("create connection pool");
        pool.get()
            .expect("get connection")
            .run_pending_migrations(MIGRATIONS)
            .expect("run migrations");
        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

/// Seeded stages, in position order.
pub const LEAD: i32 = 1;
pub const CONTACTED: i32 = 2;
pub const WON: i32 = 5;

pub fn stage(id: i32) -> StageId {
    StageId::new(id).unwrap()
}

pub fn create_client(repo: &DieselRepository, name: &str, stage_id: i32) -> Client {
    let new_client = NewClient::new(
        ClientName::new(name).unwrap(),
        None,
        Some(stage(stage_id)),
        Priority::default(),
        None,
    );
    repo.create_client(&new_client).unwrap()
}

pub fn create_tag(repo: &DieselRepository, name: &str) -> Tag {
    repo.create_tag(&NewTag::new(TagName::new(name).unwrap(), String::new()))
        .unwrap()
}
