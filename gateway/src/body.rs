//! Translation of raw request bodies into store expressions and records.
//!
//! Filters and updates are read as extended JSON, so clients can embed store
//! operators (`$gt`, `$in`, `$set`) and typed literals (`{"$oid": ...}`,
//! `{"$date": ...}`) directly. An empty body is an empty expression. Any
//! other body that is not a JSON object is rejected instead of being
//! silently widened into a match-everything filter.

use bson::{Bson, Document};
use petbook_core::Pet;
use serde_json::Value;

use crate::error::{GatewayError, INVALID_REQUEST};

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

fn malformed(reason: impl std::fmt::Display) -> GatewayError {
    GatewayError::Validation(format!("Malformed request body: {reason}"))
}

/// Convert one JSON value into a BSON document, if it is an object.
fn to_document(value: Value) -> Result<Document, String> {
    if !value.is_object() {
        return Err("expected a JSON object".to_string());
    }
    match Bson::try_from(value) {
        Ok(Bson::Document(doc)) => Ok(doc),
        Ok(other) => Err(format!("expected a document, found {:?}", other.element_type())),
        Err(err) => Err(err.to_string()),
    }
}

/// Parse a filter expression for read and delete.
pub fn parse_filter(body: &[u8]) -> Result<Document, GatewayError> {
    if is_blank(body) {
        return Ok(Document::new());
    }
    let value: Value = serde_json::from_slice(body).map_err(malformed)?;
    to_document(value).map_err(malformed)
}

/// Parse the `[filter, update]` pair for update. Every failure reads the
/// same to the client.
pub fn parse_update_pair(body: &[u8]) -> Result<(Document, Document), GatewayError> {
    let invalid = || GatewayError::Validation(INVALID_REQUEST.to_string());

    let Ok(Value::Array(items)) = serde_json::from_slice::<Value>(body) else {
        return Err(invalid());
    };
    let Ok([filter, update]) = <[Value; 2]>::try_from(items) else {
        return Err(invalid());
    };
    let filter = to_document(filter).map_err(|_| invalid())?;
    let update = to_document(update).map_err(|_| invalid())?;
    Ok((filter, update))
}

/// Parse a candidate record for create. A client-supplied `_id` is dropped;
/// the store assigns identifiers.
pub fn parse_pet(body: &[u8]) -> Result<Pet, GatewayError> {
    if is_blank(body) {
        return Ok(Pet::default());
    }
    let mut pet: Pet = serde_json::from_slice(body).map_err(malformed)?;
    pet.id = None;
    Ok(pet)
}
