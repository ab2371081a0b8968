//! Conversion between `Pet` and its stored document form.
//!
//! Unset fields are never written. Reading is lenient about absence (absent
//! means unset) but strict about type, since update expressions can leave
//! arbitrary values behind and a wrong type must not be reported as unset.

use bson::oid::ObjectId;
use bson::{Bson, Document};
use chrono::{DateTime, Utc};
use petbook_core::Pet;

use crate::store::StoreError;

pub fn to_document(pet: &Pet) -> Document {
    let mut doc = Document::new();
    if let Some(id) = pet.id {
        doc.insert("_id", id);
    }
    put_str(&mut doc, "name", &pet.name);
    if let Some(dob) = pet.dob {
        doc.insert("dob", bson::DateTime::from_millis(dob.timestamp_millis()));
    }
    put_str(&mut doc, "owner_name", &pet.owner_name);
    put_str(&mut doc, "species", &pet.species);
    put_int(&mut doc, "height", pet.height);
    put_int(&mut doc, "weight", pet.weight);
    put_str(&mut doc, "favorite_toy", &pet.favorite_toy);
    put_str(&mut doc, "breed", &pet.breed);
    doc
}

fn put_str(doc: &mut Document, key: &str, value: &str) {
    if !value.is_empty() {
        doc.insert(key, value);
    }
}

fn put_int(doc: &mut Document, key: &str, value: i32) {
    if value != 0 {
        doc.insert(key, value);
    }
}

pub fn from_document(doc: &Document) -> Result<Pet, StoreError> {
    Ok(Pet {
        id: object_id(doc)?,
        name: string(doc, "name")?,
        dob: date(doc, "dob")?,
        owner_name: string(doc, "owner_name")?,
        species: string(doc, "species")?,
        height: int32(doc, "height")?,
        weight: int32(doc, "weight")?,
        favorite_toy: string(doc, "favorite_toy")?,
        breed: string(doc, "breed")?,
    })
}

fn mismatch(key: &str, expected: &str, found: &Bson) -> StoreError {
    StoreError::Decode(format!(
        "field `{key}`: expected {expected}, found {:?}",
        found.element_type()
    ))
}

fn present<'a>(doc: &'a Document, key: &str) -> Option<&'a Bson> {
    match doc.get(key) {
        None | Some(Bson::Null) => None,
        value => value,
    }
}

fn object_id(doc: &Document) -> Result<Option<ObjectId>, StoreError> {
    match present(doc, "_id") {
        None => Ok(None),
        Some(Bson::ObjectId(id)) => Ok(Some(*id)),
        Some(other) => Err(mismatch("_id", "ObjectId", other)),
    }
}

fn string(doc: &Document, key: &str) -> Result<String, StoreError> {
    match present(doc, key) {
        None => Ok(String::new()),
        Some(Bson::String(s)) => Ok(s.clone()),
        Some(other) => Err(mismatch(key, "string", other)),
    }
}

fn int32(doc: &Document, key: &str) -> Result<i32, StoreError> {
    match present(doc, key) {
        None => Ok(0),
        Some(Bson::Int32(n)) => Ok(*n),
        Some(value @ Bson::Int64(n)) => i32::try_from(*n).map_err(|_| mismatch(key, "int32", value)),
        Some(value @ Bson::Double(n)) => {
            if n.fract() == 0.0 && *n >= f64::from(i32::MIN) && *n <= f64::from(i32::MAX) {
                Ok(*n as i32)
            } else {
                Err(mismatch(key, "int32", value))
            }
        }
        Some(other) => Err(mismatch(key, "int32", other)),
    }
}

fn date(doc: &Document, key: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
    match present(doc, key) {
        None => Ok(None),
        Some(value @ Bson::DateTime(dt)) => DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis())
            .map(Some)
            .ok_or_else(|| mismatch(key, "datetime in range", value)),
        Some(other) => Err(mismatch(key, "datetime", other)),
    }
}
