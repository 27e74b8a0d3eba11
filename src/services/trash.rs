//! Trash lifecycle: `Active -> Trashed -> Active` through soft delete and
//! restore, `Trashed -> Gone` through permanent delete.

use crate::domain::client::Client;
use crate::domain::types::ClientId;
use crate::repository::ClientWriter;
use crate::services::ServiceResult;
use crate::services::confirm::{Confirm, ConfirmAction, Confirmed};
use crate::services::store::RecordStore;

/// Moves a client to the trash after confirmation. The stage is preserved.
pub fn soft_delete<R, C>(
    repo: &R,
    store: &mut RecordStore,
    confirm: &C,
    client_id: ClientId,
) -> ServiceResult<Confirmed<Client>>
where
    R: ClientWriter + ?Sized,
    C: Confirm + ?Sized,
{
    if !confirm.confirm(&ConfirmAction::SoftDelete { count: 1 }) {
        return Ok(Confirmed::Declined);
    }

    let trashed = repo.soft_delete_client(client_id).map_err(|err| {
        log::error!("Failed to move client {client_id} to trash: {err}");
        err
    })?;
    store.apply_confirmed(trashed.clone());

    Ok(Confirmed::Done(trashed))
}

/// Brings a trashed client back into its last stage.
pub fn restore<R>(repo: &R, store: &mut RecordStore, client_id: ClientId) -> ServiceResult<Client>
where
    R: ClientWriter + ?Sized,
{
    let restored = repo.restore_client(client_id).map_err(|err| {
        log::error!("Failed to restore client {client_id}: {err}");
        err
    })?;
    store.apply_confirmed(restored.clone());

    Ok(restored)
}

/// Irreversibly deletes a client. Whether the client is actually in the trash
/// is checked by the record store, not here.
pub fn permanent_delete<R, C>(
    repo: &R,
    store: &mut RecordStore,
    confirm: &C,
    client_id: ClientId,
) -> ServiceResult<Confirmed<()>>
where
    R: ClientWriter + ?Sized,
    C: Confirm + ?Sized,
{
    if !confirm.confirm(&ConfirmAction::PermanentDelete { client_id }) {
        return Ok(Confirmed::Declined);
    }

    repo.permanent_delete_client(client_id).map_err(|err| {
        log::error!("Failed to permanently delete client {client_id}: {err}");
        err
    })?;
    store.remove_from_cache(client_id);
    log::info!("Permanently deleted client {client_id}");

    Ok(Confirmed::Done(()))
}
