//! Database models shared across the pipeline repository.

pub mod client;
#[cfg(feature = "server")]
pub mod config;
pub mod stage;
pub mod tag;
