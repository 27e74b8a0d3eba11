//! Bulk operation coordinator.
//!
//! One blocking repository call per item, fanned out over the rayon pool.
//! Every item settles independently; the report carries one outcome per input
//! id and the record store only sees the items the repository confirmed.

use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::Serialize;

use crate::domain::client::{Client, UpdateClient};
use crate::domain::types::{ClientId, StageId, TagId};
use crate::domain::view_state::PipelineViewState;
use crate::repository::{ClientReader, ClientWriter};
use crate::repository::errors::RepositoryResult;
use crate::services::confirm::{Confirm, ConfirmAction, Confirmed};
use crate::services::store::RecordStore;
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ItemOutcome {
    Succeeded,
    Failed { reason: String },
}

impl ItemOutcome {
    fn failed(reason: impl Into<String>) -> Self {
        ItemOutcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Succeeded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemResult {
    pub client_id: ClientId,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

/// Per-item outcomes of one bulk operation, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkReport {
    pub items: Vec<ItemResult>,
}

impl BulkReport {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    pub fn outcome(&self, client_id: ClientId) -> Option<&ItemOutcome> {
        self.items
            .iter()
            .find(|i| i.client_id == client_id)
            .map(|i| &i.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = (ClientId, &str)> {
        self.items.iter().filter_map(|i| match &i.outcome {
            ItemOutcome::Failed { reason } => Some((i.client_id, reason.as_str())),
            ItemOutcome::Succeeded => None,
        })
    }
}

/// Work decided for one item before the fan-out.
enum Plan<T> {
    Skip,
    Reject(String),
    Call(T),
}

/// Collapses repeated ids, keeping the first occurrence.
fn dedupe(ids: &[ClientId]) -> Vec<ClientId> {
    let mut seen = BTreeSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Runs `call` for every planned item concurrently and waits for all of them.
/// Returns the report together with the confirmed records.
fn settle_all<T, F>(plans: Vec<(ClientId, Plan<T>)>, call: F) -> (BulkReport, Vec<Client>)
where
    T: Send,
    F: Fn(ClientId, T) -> RepositoryResult<Client> + Sync,
{
    let settled: Vec<(ClientId, ItemOutcome, Option<Client>)> = plans
        .into_par_iter()
        .map(|(client_id, plan)| match plan {
            Plan::Skip => (client_id, ItemOutcome::Succeeded, None),
            Plan::Reject(reason) => (client_id, ItemOutcome::failed(reason), None),
            Plan::Call(args) => match call(client_id, args) {
                Ok(client) => (client_id, ItemOutcome::Succeeded, Some(client)),
                Err(err) => {
                    log::warn!("Bulk item for client {client_id} failed: {err}");
                    let reason = ServiceError::from(err).to_string();
                    (client_id, ItemOutcome::failed(reason), None)
                }
            },
        })
        .collect();

    let mut report = BulkReport::default();
    let mut confirmed = Vec::new();
    for (client_id, outcome, client) in settled {
        report.items.push(ItemResult { client_id, outcome });
        confirmed.extend(client);
    }

    log::info!(
        "Bulk operation settled: {} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );
    (report, confirmed)
}

/// Moves every client in `ids` to `target`. Clients already cached in
/// `target` succeed without a request.
pub fn bulk_change_stage<R>(
    repo: &R,
    store: &mut RecordStore,
    ids: &[ClientId],
    target: StageId,
) -> BulkReport
where
    R: ClientWriter + Sync + ?Sized,
{
    let plans = dedupe(ids)
        .into_iter()
        .map(|id| match store.client(id) {
            Some(client) if client.stage_id == target => (id, Plan::Skip),
            _ => (id, Plan::Call(())),
        })
        .collect();

    let (report, confirmed) = settle_all(plans, |client_id, ()| {
        repo.change_stage(client_id, target)
    });
    for client in confirmed {
        store.apply_stage_change(client.id, client.stage_id);
    }
    report
}

/// Resolves the client a tag request is built from: the cached record, or a
/// fresh read from the record store when it is not cached.
fn tag_source<R>(repo: &R, store: &RecordStore, client_id: ClientId) -> Result<Client, String>
where
    R: ClientReader + ?Sized,
{
    if let Some(client) = store.client(client_id) {
        return Ok(client.clone());
    }
    match repo.get_client_by_id(client_id) {
        Ok(Some(client)) => Ok(client),
        Ok(None) => Err(ServiceError::NotFound.to_string()),
        Err(err) => {
            log::warn!("Failed to read client {client_id} for tag add: {err}");
            Err(ServiceError::from(err).to_string())
        }
    }
}

/// Adds the tag named `tag_name` to every client in `ids`.
///
/// The tag is resolved against the cached tag table; an unknown name fails
/// every item. Each request sends the client's full tag set, read from the
/// record store for clients that are not cached.
pub fn bulk_add_tag<R>(
    repo: &R,
    store: &mut RecordStore,
    ids: &[ClientId],
    tag_name: &str,
) -> BulkReport
where
    R: ClientReader + ClientWriter + Sync + ?Sized,
{
    let ids = dedupe(ids);
    let Some(tag_id) = store.tag_by_name(tag_name).map(|t| t.id) else {
        let reason = format!("unknown tag `{}`", tag_name.trim());
        log::warn!("Bulk tag add rejected: {reason}");
        return BulkReport {
            items: ids
                .into_iter()
                .map(|client_id| ItemResult {
                    client_id,
                    outcome: ItemOutcome::failed(reason.clone()),
                })
                .collect(),
        };
    };

    let plans = ids
        .into_iter()
        .map(|id| match tag_source(repo, store, id) {
            Err(reason) => (id, Plan::Reject(reason)),
            Ok(client) if client.has_tag(tag_id) => (id, Plan::Skip),
            Ok(client) => {
                let mut tags = client.tags;
                tags.insert(tag_id);
                (id, Plan::Call(tags))
            }
        })
        .collect();

    let (report, confirmed) = settle_all(plans, |client_id, tags: BTreeSet<TagId>| {
        repo.update_client(client_id, &UpdateClient::default().tags(tags))
    });
    for client in confirmed {
        if store.client(client.id).is_some() {
            store.apply_tag_add(client.id, tag_id);
        } else {
            store.apply_confirmed(client);
        }
    }
    report
}

/// Moves every client in `ids` to the trash behind a single confirmation.
pub fn bulk_soft_delete<R, C>(
    repo: &R,
    store: &mut RecordStore,
    confirm: &C,
    ids: &[ClientId],
) -> Confirmed<BulkReport>
where
    R: ClientWriter + Sync + ?Sized,
    C: Confirm + ?Sized,
{
    let ids = dedupe(ids);
    if !confirm.confirm(&ConfirmAction::SoftDelete { count: ids.len() }) {
        return Confirmed::Declined;
    }

    let plans = ids.into_iter().map(|id| (id, Plan::Call(()))).collect();
    let (report, confirmed) = settle_all(plans, |client_id, ()| {
        repo.soft_delete_client(client_id)
    });
    for client in confirmed {
        store.apply_confirmed(client);
    }
    Confirmed::Done(report)
}

fn require_selection(view: &PipelineViewState) -> ServiceResult<Vec<ClientId>> {
    if view.has_selection() {
        Ok(view.selected_ids())
    } else {
        Err(ServiceError::Validation("no clients selected".to_string()))
    }
}

/// Bulk stage change over the view's selection. The selection is cleared once
/// the batch settled, whatever the outcomes.
pub fn change_stage_for_selection<R>(
    repo: &R,
    store: &mut RecordStore,
    view: &mut PipelineViewState,
    target: StageId,
) -> ServiceResult<BulkReport>
where
    R: ClientWriter + Sync + ?Sized,
{
    let ids = require_selection(view)?;
    let report = bulk_change_stage(repo, store, &ids, target);
    view.clear_selection();
    Ok(report)
}

pub fn add_tag_to_selection<R>(
    repo: &R,
    store: &mut RecordStore,
    view: &mut PipelineViewState,
    tag_name: &str,
) -> ServiceResult<BulkReport>
where
    R: ClientReader + ClientWriter + Sync + ?Sized,
{
    let ids = require_selection(view)?;
    let report = bulk_add_tag(repo, store, &ids, tag_name);
    view.clear_selection();
    Ok(report)
}

/// Bulk soft delete over the view's selection. A declined confirmation keeps
/// the selection.
pub fn soft_delete_selection<R, C>(
    repo: &R,
    store: &mut RecordStore,
    view: &mut PipelineViewState,
    confirm: &C,
) -> ServiceResult<Confirmed<BulkReport>>
where
    R: ClientWriter + Sync + ?Sized,
    C: Confirm + ?Sized,
{
    let ids = require_selection(view)?;
    let result = bulk_soft_delete(repo, store, confirm, &ids);
    if !result.is_declined() {
        view.clear_selection();
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: i32) -> ClientId {
        ClientId::new(value).unwrap()
    }

    #[test]
    fn dedupe_keeps_first_occurrence_order() {
        assert_eq!(dedupe(&[id(3), id(1), id(3), id(2), id(1)]), vec![id(3), id(1), id(2)]);
    }

    #[test]
    fn report_counts_outcomes() {
        let report = BulkReport {
            items: vec![
                ItemResult {
                    client_id: id(1),
                    outcome: ItemOutcome::Succeeded,
                },
                ItemResult {
                    client_id: id(2),
                    outcome: ItemOutcome::failed("not found"),
                },
            ],
        };
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures().collect::<Vec<_>>(), vec![(id(2), "not found")]);
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod mock_tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::client::ClientListQuery;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::store::fixtures::{client, stage, tag};

    fn id(value: i32) -> ClientId {
        ClientId::new(value).unwrap()
    }

    fn stage_id(value: i32) -> StageId {
        StageId::new(value).unwrap()
    }

    fn five_clients() -> RecordStore {
        RecordStore::with_records(
            vec![stage(1, "Lead", 0), stage(2, "Won", 1)],
            vec![tag(1, "vip")],
            (1..=5).map(|i| client(i, &format!("Client {i}"), 1)).collect(),
            ClientListQuery::active(),
        )
    }

    #[test]
    fn partial_failure_reports_every_item() {
        let mut repo = MockRepository::new();
        repo.expect_change_stage()
            .times(5)
            .returning(|client_id, stage| {
                if client_id.get() == 3 {
                    return Err(RepositoryError::NotFound);
                }
                let mut moved = client(client_id.get(), "moved", 1);
                moved.stage_id = stage;
                Ok(moved)
            });
        let mut store = five_clients();
        let ids: Vec<ClientId> = (1..=5).map(id).collect();

        let report = bulk_change_stage(&repo, &mut store, &ids, stage_id(2));

        assert_eq!(report.succeeded(), 4);
        assert_eq!(report.failed(), 1);
        assert_eq!(
            report.items.iter().map(|i| i.client_id).collect::<Vec<_>>(),
            ids
        );
        assert!(!report.outcome(id(3)).unwrap().is_success());
        let moved = store
            .clients()
            .iter()
            .filter(|c| c.stage_id == stage_id(2))
            .count();
        assert_eq!(moved, 4);
        assert_eq!(store.client(id(3)).unwrap().stage_id, stage_id(1));
    }

    #[test]
    fn clients_already_in_target_skip_the_request() {
        let mut repo = MockRepository::new();
        repo.expect_change_stage().times(0);
        let mut store = five_clients();

        let report = bulk_change_stage(&repo, &mut store, &[id(1), id(2)], stage_id(1));

        assert_eq!(report.succeeded(), 2);
    }

    #[test]
    fn tag_add_is_idempotent() {
        let mut repo = MockRepository::new();
        repo.expect_update_client()
            .times(1)
            .returning(|client_id, updates| {
                let mut updated = client(client_id.get(), "Client 1", 1);
                updated.tags = updates.tags.clone().unwrap_or_default();
                Ok(updated)
            });
        let mut store = five_clients();

        let first = bulk_add_tag(&repo, &mut store, &[id(1)], "vip");
        let after_first = store.client(id(1)).unwrap().tags.clone();
        let second = bulk_add_tag(&repo, &mut store, &[id(1)], "vip");

        assert_eq!(first.succeeded(), 1);
        assert_eq!(second.succeeded(), 1);
        assert_eq!(store.client(id(1)).unwrap().tags, after_first);
        assert_eq!(after_first.len(), 1);
    }

    #[test]
    fn unknown_tag_fails_every_item() {
        let mut repo = MockRepository::new();
        repo.expect_update_client().times(0);
        let mut store = five_clients();

        let report = bulk_add_tag(&repo, &mut store, &[id(1), id(2)], "missing");

        assert_eq!(report.failed(), 2);
    }

    #[test]
    fn uncached_client_is_read_before_tag_add() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .withf(|client_id| client_id.get() == 42)
            .times(1)
            .returning(|client_id| Ok(Some(client(client_id.get(), "Initech", 1))));
        repo.expect_update_client()
            .withf(|client_id, updates| {
                client_id.get() == 42
                    && updates.tags.as_ref().is_some_and(|tags| tags.len() == 1)
            })
            .times(1)
            .returning(|client_id, updates| {
                let mut updated = client(client_id.get(), "Initech", 1);
                updated.tags = updates.tags.clone().unwrap_or_default();
                Ok(updated)
            });
        let mut store = five_clients();

        let report = bulk_add_tag(&repo, &mut store, &[id(42)], "vip");

        assert_eq!(report.succeeded(), 1);
        let cached = store.client(id(42)).unwrap();
        assert!(cached.has_tag(TagId::new(1).unwrap()));
    }

    #[test]
    fn missing_client_fails_tag_add() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id().times(1).returning(|_| Ok(None));
        repo.expect_update_client().times(0);
        let mut store = five_clients();
        store.apply_tag_add(id(1), TagId::new(1).unwrap());

        let report = bulk_add_tag(&repo, &mut store, &[id(42), id(1)], "vip");

        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures().collect::<Vec<_>>(), vec![(id(42), "not found")]);
        assert_eq!(report.outcome(id(1)), Some(&ItemOutcome::Succeeded));
    }

    #[test]
    fn soft_delete_selection_asks_once_and_clears_selection() {
        let mut repo = MockRepository::new();
        repo.expect_soft_delete_client()
            .times(2)
            .returning(|client_id| {
                let mut trashed = client(client_id.get(), "gone", 1);
                trashed.is_deleted = true;
                trashed.deleted_at = Some(Utc::now().naive_utc());
                Ok(trashed)
            });
        let mut store = five_clients();
        let mut view = PipelineViewState::default();
        view.select_all([id(1), id(2)]);
        let prompts = std::sync::atomic::AtomicUsize::new(0);
        let confirm = |action: &ConfirmAction| {
            prompts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            *action == ConfirmAction::SoftDelete { count: 2 }
        };

        let report = soft_delete_selection(&repo, &mut store, &mut view, &confirm)
            .unwrap()
            .done()
            .unwrap();

        assert_eq!(prompts.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(store.clients().len(), 3);
        assert!(!view.has_selection());
    }

    #[test]
    fn failed_soft_delete_keeps_client_cached() {
        let mut repo = MockRepository::new();
        repo.expect_soft_delete_client()
            .times(3)
            .returning(|client_id| {
                if client_id.get() == 2 {
                    return Err(RepositoryError::ConnectionError("database is locked".into()));
                }
                let mut trashed = client(client_id.get(), "gone", 1);
                trashed.is_deleted = true;
                trashed.deleted_at = Some(Utc::now().naive_utc());
                Ok(trashed)
            });
        let mut store = five_clients();

        let report = bulk_soft_delete(
            &repo,
            &mut store,
            &|_: &ConfirmAction| true,
            &[id(1), id(2), id(3)],
        )
        .done()
        .unwrap();

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.outcome(id(2)).unwrap().is_success());
        assert!(store.client(id(1)).is_none());
        assert!(store.client(id(3)).is_none());
        assert!(!store.client(id(2)).unwrap().is_deleted);
        assert_eq!(store.clients().len(), 3);
    }

    #[test]
    fn declined_bulk_delete_keeps_selection() {
        let mut repo = MockRepository::new();
        repo.expect_soft_delete_client().times(0);
        let mut store = five_clients();
        let mut view = PipelineViewState::default();
        view.select(id(1));

        let result =
            soft_delete_selection(&repo, &mut store, &mut view, &|_: &ConfirmAction| false)
                .unwrap();

        assert!(result.is_declined());
        assert!(view.is_selected(id(1)));
    }

    #[test]
    fn empty_selection_is_rejected() {
        let repo = MockRepository::new();
        let mut store = five_clients();
        let mut view = PipelineViewState::default();

        let result = change_stage_for_selection(&repo, &mut store, &mut view, stage_id(2));

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }
}
