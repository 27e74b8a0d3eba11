//! Response shapes of the JSON API. Tags leave the crate as names.

pub mod board;
pub mod client;
