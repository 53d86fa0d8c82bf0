use std::convert::Infallible;

use bytes::Bytes;
use guest_rsvp_config::ConfigError;
use guest_rsvp_database::error::DatabaseError;
use guest_rsvp_model::ValidationErrors;
use http::{Method, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use tracing::{debug, error};

use crate::response::json_bytes_response;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("request body is larger than {0} bytes")]
    PayloadTooLarge(usize),
    #[error("failed to read request body: {0}")]
    Body(Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to encode response: {0}")]
    Encode(serde_json::Error),
    #[error("storage unavailable: {0}")]
    Database(#[from] DatabaseError),
    #[error("no route for {0}")]
    NotFound(String),
    #[error("method {0} is not allowed here")]
    MethodNotAllowed(Method),
    #[error("IO error: {0}")]
    File(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl From<Infallible> for AppError {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Json(_) | Self::Body(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Encode(_) | Self::Database(_) | Self::File(_) | Self::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// `{"error": "..."}` with the matching status code.
    #[must_use]
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let status = self.status();
        if status.is_server_error() {
            error!("{self}");
        } else {
            debug!("{self}");
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        // a struct with one string field always serializes
        let bytes = serde_json::to_vec(&body).unwrap_or_default();
        json_bytes_response(status, bytes)
    }
}

#[cfg(test)]
mod tests {
    use guest_rsvp_model::FieldError;
    use http_body_util::BodyExt as _;

    use super::*;

    #[tokio::test]
    async fn validation_errors_are_bad_requests() {
        let error = AppError::from(ValidationErrors(vec![FieldError {
            field: "availableDays",
            message: "out of range".to_owned(),
        }]));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body["error"],
            "Guest validation failed: availableDays: out of range"
        );
    }

    #[test]
    fn storage_errors_are_server_errors() {
        assert_eq!(
            AppError::from(DatabaseError::Poisoned).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
