//! Pipeline services operating on the record store cache and the repository.

pub mod bulk;
pub mod confirm;
pub mod errors;
pub mod export;
pub mod filter;
pub mod import;
pub mod session;
pub mod stage;
pub mod store;
pub mod tag;
pub mod trash;

pub use errors::{ServiceError, ServiceResult};
