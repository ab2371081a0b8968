//! Error types for the pet records API client.
//!
//! # Design
//! A 400 from the gateway carries a human-readable reason (the offending
//! field, or "Invalid request.") and gets its own `Rejected` variant. Any
//! other non-200 response lands in `HttpError` with the raw status and body.

use std::fmt;

/// Errors returned by `PetClient` build and parse methods.
#[derive(Debug)]
pub enum ApiError {
    /// The gateway returned 400; the body holds the reason.
    Rejected(String),

    /// The gateway returned a non-200 status other than 400.
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Rejected(reason) => write!(f, "request rejected: {reason}"),
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
