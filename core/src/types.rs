//! Domain DTOs for the pet records API.
//!
//! # Design
//! `Pet` is both the create payload and the record the gateway returns. Every
//! field except `_id` is plain data with an empty/zero "unset" value, and
//! unset fields are omitted from JSON output. `_id` is an ObjectId rendered as
//! extended JSON (`{"$oid": "..."}`) so a returned id can be placed directly
//! into a filter expression.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single pet record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    /// Assigned by the store on creation.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,
    /// Date of birth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub owner_name: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub species: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_zero")]
    pub height: i32,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_zero")]
    pub weight: i32,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub favorite_toy: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub breed: String,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

/// An explicit `null` reads the same as an omitted field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Result summary of a bulk delete.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteSummary {
    #[serde(rename = "DeletedCount")]
    pub deleted_count: u64,
}
