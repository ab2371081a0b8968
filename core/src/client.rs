//! Stateless HTTP request builder and response parser for the pets API.
//!
//! # Design
//! `PetClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. Filters and updates are passed through as
//! `serde_json::Value` in extended JSON form; the gateway interprets them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{DeleteSummary, Pet};

/// Synchronous, stateless client for the pets API.
#[derive(Debug, Clone)]
pub struct PetClient {
    base_url: String,
}

impl PetClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_read(&self, filter: &Value) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Get, filter)
    }

    pub fn build_create(&self, pet: &Pet) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Post, pet)
    }

    /// The gateway expects the filter and update as a two-element array.
    pub fn build_update(&self, filter: &Value, update: &Value) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Patch, &[filter, update])
    }

    pub fn build_delete(&self, filter: &Value) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Delete, filter)
    }

    pub fn parse_read(&self, response: HttpResponse) -> Result<Vec<Pet>, ApiError> {
        parse_ok(response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Pet, ApiError> {
        parse_ok(response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<Vec<Pet>, ApiError> {
        parse_ok(response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<DeleteSummary, ApiError> {
        parse_ok(response)
    }

    fn request<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        body: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}/pets", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body,
        })
    }
}

fn parse_ok<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        200 => Ok(()),
        400 => Err(ApiError::Rejected(response.body.clone())),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}
