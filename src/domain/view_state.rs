//! Caller-owned state of the pipeline view: active filters, trash toggle and
//! the multi-select set used by bulk operations.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::client::ClientListQuery;
use crate::domain::filter::ClientFilter;
use crate::domain::types::ClientId;

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct PipelineViewState {
    pub filter: ClientFilter,
    /// Shows trashed clients instead of active ones.
    pub show_trash: bool,
    selection: BTreeSet<ClientId>,
}

impl PipelineViewState {
    pub fn new(filter: ClientFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Server-side part of the filter, used when (re)loading the record store.
    pub fn list_query(&self) -> ClientListQuery {
        ClientListQuery {
            is_deleted: self.show_trash,
            priority: self.filter.priority,
        }
    }

    /// Flips between the active list and the trash. The selection refers to the
    /// previous list and is dropped.
    pub fn set_show_trash(&mut self, show_trash: bool) {
        if self.show_trash != show_trash {
            self.selection.clear();
        }
        self.show_trash = show_trash;
    }

    pub fn is_selected(&self, id: ClientId) -> bool {
        self.selection.contains(&id)
    }

    /// Toggles `id` and returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: ClientId) -> bool {
        if self.selection.remove(&id) {
            false
        } else {
            self.selection.insert(id);
            true
        }
    }

    pub fn select(&mut self, id: ClientId) {
        self.selection.insert(id);
    }

    pub fn deselect(&mut self, id: ClientId) {
        self.selection.remove(&id);
    }

    pub fn select_all(&mut self, ids: impl IntoIterator<Item = ClientId>) {
        self.selection.extend(ids);
    }

    pub fn replace_selection(&mut self, ids: impl IntoIterator<Item = ClientId>) {
        self.selection = ids.into_iter().collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected_ids(&self) -> Vec<ClientId> {
        self.selection.iter().copied().collect()
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }
}
