//! JSON endpoints under `/api/v1`.
//!
//! Every handler works on the shared [`PipelineSession`]; holding its lock for
//! the whole request serializes overlapping bulk operations.

use std::sync::{Mutex, MutexGuard};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::domain::types::ClientId;
use crate::forms::FormError;
use crate::services::ServiceError;
use crate::services::session::PipelineSession;

pub mod bulk;
pub mod client;
pub mod import;
pub mod pipeline;
pub mod tag;

pub type SharedSession = Mutex<PipelineSession>;

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) | ServiceError::Parse(_) | ServiceError::Mapping(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServiceError::Fetch(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

pub(crate) fn lock_session(
    session: &SharedSession,
) -> Result<MutexGuard<'_, PipelineSession>, ServiceError> {
    session.lock().map_err(|_| {
        log::error!("Pipeline session lock is poisoned");
        ServiceError::Fetch("pipeline session unavailable".to_string())
    })
}

pub(crate) fn parse_client_id(raw: i32) -> Result<ClientId, ServiceError> {
    ClientId::new(raw).map_err(|_| FormError::InvalidClientId.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_status_codes() {
        assert_eq!(ServiceError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServiceError::Mapping("name".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServiceError::Fetch("down".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ServiceError::Internal("csv".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn zero_client_id_is_a_validation_error() {
        assert!(matches!(parse_client_id(0), Err(ServiceError::Validation(_))));
    }
}
