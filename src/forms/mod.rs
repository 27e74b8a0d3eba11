//! Request payloads accepted by the JSON API.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;
use crate::services::ServiceError;

pub mod bulk;
pub mod client;
pub mod filter;
pub mod import;
pub mod tag;

#[derive(Debug, Error)]
/// Errors that can occur when processing request payloads.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid client id")]
    InvalidClientId,

    #[error("invalid stage id")]
    InvalidStageId,

    #[error("unknown tag `{0}`")]
    UnknownTag(String),

    #[error("invalid mapping: {0}")]
    InvalidMapping(String),

    #[error(transparent)]
    Constraint(#[from] TypeConstraintError),
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::InvalidMapping(message) => ServiceError::Mapping(message),
            other => ServiceError::Validation(other.to_string()),
        }
    }
}
