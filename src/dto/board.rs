use serde::Serialize;

use crate::domain::stage::Stage;
use crate::dto::client::{ClientView, client_views};
use crate::services::store::{RecordStore, StageColumn};

#[derive(Debug, Serialize)]
pub struct BoardColumn<'a> {
    pub stage: &'a Stage,
    pub clients: Vec<ClientView<'a>>,
}

pub fn board_view<'a>(
    store: &'a RecordStore,
    columns: Vec<StageColumn<'a>>,
) -> Vec<BoardColumn<'a>> {
    columns
        .into_iter()
        .map(|column| BoardColumn {
            stage: column.stage,
            clients: client_views(store, &column.clients),
        })
        .collect()
}
