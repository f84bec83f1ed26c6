use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use eventboard_core::events::ValidationErrors;
use eventboard_core::storage::{repository_error_to_status_code, RepositoryError};
use thiserror::Error;

use crate::service::EventServiceError;

/// Error type for JSON handlers.
///
/// Store failures are mapped to the status code of the underlying
/// [`RepositoryError`]; anything else is a 500.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

fn status_for_repository(error: &RepositoryError) -> StatusCode {
    StatusCode::from_u16(repository_error_to_status_code(error))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Status code for a failed façade call.
pub fn status_for_service_error(error: &EventServiceError) -> StatusCode {
    if let Some(source) = error.repository_error() {
        return status_for_repository(source);
    }

    match error {
        EventServiceError::MissingField(_) | EventServiceError::InvalidDate(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        if let Some(service_error) = self.0.downcast_ref::<EventServiceError>() {
            return status_for_service_error(service_error);
        }
        if self.0.is::<ValidationRejection>() {
            return StatusCode::UNPROCESSABLE_ENTITY;
        }

        match self.0.downcast_ref::<RepositoryError>() {
            Some(repo_error) => status_for_repository(repo_error),
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(ValidationRejection(errors)) = self.0.downcast_ref::<ValidationRejection>() {
            tracing::warn!(fields = errors.len(), "Validation failed");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "errors": errors })),
            )
                .into_response();
        }

        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::warn!(error = %self.0, "Request rejected");
        }

        (status_code, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Field-level validation failure, answered with 422 and the field map.
#[derive(Debug, Error)]
#[error("Validation failed")]
pub struct ValidationRejection(pub ValidationErrors);
