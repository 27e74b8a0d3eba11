//! Domain aggregates exposed by the pipeline service layer.

pub mod client;
pub mod filter;
pub mod stage;
pub mod tag;
pub mod types;
pub mod view_state;
