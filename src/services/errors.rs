use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

/// Failures surfaced by the pipeline services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Record store unreachable or failing.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Field rejected by the record store or by local value constraints.
    #[error("validation error: {0}")]
    Validation(String),

    /// Referenced record does not exist (stale id).
    #[error("not found")]
    NotFound,

    /// Malformed CSV structure.
    #[error("parse error: {0}")]
    Parse(String),

    /// A required CSV column is not mapped.
    #[error("mapping error: {0}")]
    Mapping(String),

    /// Local failure unrelated to the request input.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ValidationError(message)
            | RepositoryError::ConstraintViolation(message) => ServiceError::Validation(message),
            other => ServiceError::Fetch(other.to_string()),
        }
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::Validation(val.to_string())
    }
}
