//! User confirmation for destructive actions.
//!
//! Asking the user is the caller's business; services only consult the
//! [`Confirm`] implementation they are handed before touching the record store.

use serde::Serialize;

use crate::domain::types::ClientId;

/// Destructive action awaiting the user's consent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ConfirmAction {
    /// Move `count` clients to the trash. One prompt covers a whole batch.
    SoftDelete { count: usize },
    /// Irreversibly delete one trashed client.
    PermanentDelete { client_id: ClientId },
}

pub trait Confirm {
    fn confirm(&self, action: &ConfirmAction) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&ConfirmAction) -> bool,
{
    fn confirm(&self, action: &ConfirmAction) -> bool {
        self(action)
    }
}

/// Result of an operation gated by a confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "lowercase")]
pub enum Confirmed<T> {
    Done(T),
    /// The user declined; nothing was sent and nothing changed.
    Declined,
}

impl<T> Confirmed<T> {
    pub fn is_declined(&self) -> bool {
        matches!(self, Confirmed::Declined)
    }

    pub fn as_ref(&self) -> Confirmed<&T> {
        match self {
            Confirmed::Done(value) => Confirmed::Done(value),
            Confirmed::Declined => Confirmed::Declined,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Confirmed<U> {
        match self {
            Confirmed::Done(value) => Confirmed::Done(f(value)),
            Confirmed::Declined => Confirmed::Declined,
        }
    }

    pub fn done(self) -> Option<T> {
        match self {
            Confirmed::Done(value) => Some(value),
            Confirmed::Declined => None,
        }
    }
}
