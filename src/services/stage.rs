//! Stage transition engine: moves one client to another stage.

use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, StageId};
use crate::repository::ClientWriter;
use crate::services::ServiceResult;
use crate::services::store::RecordStore;

/// Outcome of a single stage transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StageChange {
    /// Target equals the current stage; nothing was sent.
    Unchanged,
    Moved {
        /// Stage before the move, when the client was cached.
        from: Option<StageId>,
        to: StageId,
    },
}

/// A card dropped onto a stage column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DragDrop {
    pub client_id: ClientId,
    pub target_stage_id: StageId,
}

/// Moves `client_id` to `target`. The target stage is validated by the record
/// store, not locally. The cache is updated only after the record store
/// confirmed the move; on failure it is left as it was.
pub fn change_stage<R>(
    repo: &R,
    store: &mut RecordStore,
    client_id: ClientId,
    target: StageId,
) -> ServiceResult<StageChange>
where
    R: ClientWriter + ?Sized,
{
    let from = store.client(client_id).map(|c| c.stage_id);
    if from == Some(target) {
        return Ok(StageChange::Unchanged);
    }

    let updated = repo.change_stage(client_id, target).map_err(|err| {
        log::error!("Failed to move client {client_id} to stage {target}: {err}");
        err
    })?;

    store.apply_stage_change(client_id, updated.stage_id);
    log::info!("Moved client {client_id} to stage {}", updated.stage_id);

    Ok(StageChange::Moved {
        from,
        to: updated.stage_id,
    })
}

/// Applies a drag-and-drop gesture. Dropping a card on its own column is a
/// cancel and issues no request.
pub fn handle_drop<R>(repo: &R, store: &mut RecordStore, drop: DragDrop) -> ServiceResult<StageChange>
where
    R: ClientWriter + ?Sized,
{
    change_stage(repo, store, drop.client_id, drop.target_stage_id)
}
