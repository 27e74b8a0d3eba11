//! A pipeline view bound to its record store cache.

use chrono::{DateTime, TimeZone};

use crate::domain::client::Client;
use crate::domain::view_state::PipelineViewState;
use crate::repository::{ClientReader, StageReader, TagReader};
use crate::services::ServiceResult;
use crate::services::filter::filter_clients;
use crate::services::store::{RecordStore, StageColumn};

#[derive(Debug, Default)]
pub struct PipelineSession {
    pub store: RecordStore,
    pub view: PipelineViewState,
}

impl PipelineSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reloads the cache for the view's current server-side filter.
    pub fn reload<R>(&mut self, repo: &R) -> ServiceResult<()>
    where
        R: StageReader + TagReader + ClientReader + ?Sized,
    {
        self.store.refresh(repo, self.view.list_query())
    }

    /// Cached clients passing the view's filter, relative to `now`.
    pub fn visible<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<&Client> {
        filter_clients(self.store.clients(), &self.view.filter, now)
    }

    pub fn board<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<StageColumn<'_>> {
        self.store.board(&self.visible(now))
    }
}
