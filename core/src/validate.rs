//! Create-time validation and defaulting for pet records.
//!
//! Only record creation goes through these rules. Update expressions are
//! applied by the store as-is and may leave records that would fail here.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::types::Pet;

/// Required fields, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "name",
    "dob",
    "owner_name",
    "species",
    "height",
    "weight",
    "favorite_toy",
];

/// Seconds from the Unix epoch back to `0001-01-01T00:00:00Z`, the zero
/// instant that clients send for an unset date.
const ZERO_INSTANT_SECS: i64 = -62_135_596_800;

/// Breed assigned to dogs created without one.
pub const DEFAULT_DOG_BREED: &str = "unknown";

/// The first required field that is missing or invalid on a candidate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidField(pub &'static str);

impl fmt::Display for InvalidField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Missing or invalid field: {}", self.0)
    }
}

impl std::error::Error for InvalidField {}

impl Pet {
    /// Check the required fields in declaration order; the first failure wins.
    pub fn validate(&self) -> Result<(), InvalidField> {
        let checks = [
            self.name.is_empty(),
            self.dob.map_or(true, is_zero_instant),
            self.owner_name.is_empty(),
            self.species.is_empty(),
            self.height <= 0,
            self.weight <= 0,
            self.favorite_toy.is_empty(),
        ];
        match checks.iter().position(|failed| *failed) {
            Some(index) => Err(InvalidField(REQUIRED_FIELDS[index])),
            None => Ok(()),
        }
    }

    /// Fill optional fields that have a default.
    pub fn apply_defaults(&mut self) {
        if self.species == "dog" && self.breed.is_empty() {
            self.breed = DEFAULT_DOG_BREED.to_string();
        }
    }
}

fn is_zero_instant(dt: DateTime<Utc>) -> bool {
    dt.timestamp() == ZERO_INSTANT_SECS && dt.timestamp_subsec_nanos() == 0
}
