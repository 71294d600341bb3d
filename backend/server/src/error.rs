use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use catalog::{ValidationError, pricing::PricingError};
use thiserror::Error;
use tracing::error;

use crate::{database::StoreError, response::Envelope};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Pricing(#[from] PricingError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Route not found")]
    RouteNotFound,

    #[error("Internal error: {0}")]
    InternalError(#[from] StoreError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload | AppError::Validation(_) | AppError::Pricing(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalError(StoreError::Duplicate { .. }) => StatusCode::CONFLICT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let envelope = match &self {
            AppError::Validation(err @ ValidationError::Invalid(messages)) => {
                Envelope::failure(status, err.to_string()).with_errors(messages.clone())
            }
            AppError::InternalError(err) if status == StatusCode::INTERNAL_SERVER_ERROR => {
                error!("Request failed: {err}");
                Envelope::failure(status, "Internal Server Error").with_error(err.to_string())
            }
            _ => Envelope::failure(status, self.to_string()),
        };

        envelope.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::MalformedPayload.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Validation(ValidationError::ImmutableField("Book ID cannot be modified")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::InternalError(StoreError::Duplicate {
                collection: "books".into(),
                id: "b1".into()
            })
            .status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_validation_message_passthrough() {
        let err = AppError::from(ValidationError::ExtraFields(vec!["role".into()]));
        assert_eq!(err.to_string(), "Unexpected fields not allowed: role");
    }
}
