//! Gateway error type and its HTTP mapping.
//!
//! Both kinds are answered with a plain-text body: the validation reason for
//! 400s and the raw store error text for 500s. Nothing is retried.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use petbook_core::InvalidField;
use thiserror::Error;

use crate::store::StoreError;

/// Reply to a PATCH body that is not a `[filter, update]` pair.
pub const INVALID_REQUEST: &str = "Invalid request.";

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The client sent something the gateway refuses to forward.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<InvalidField> for GatewayError {
    fn from(err: InvalidField) -> Self {
        GatewayError::Validation(err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            GatewayError::Validation(reason) => tracing::debug!(%reason, "request rejected"),
            GatewayError::Store(err) => tracing::error!(error = %err, "store operation failed"),
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let err = GatewayError::from(InvalidField("height"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing or invalid field: height");
    }

    #[test]
    fn store_error_maps_to_500_with_raw_text() {
        let err = GatewayError::from(StoreError::Query("unknown operator: $x".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "unknown operator: $x");
    }
}
