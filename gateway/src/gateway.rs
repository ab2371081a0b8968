//! The four record operations, independent of HTTP.
//!
//! # Design
//! `PetGateway` holds nothing but the shared store handle, so every call is
//! an independent request/response cycle and any number may run at once.
//! Filters and updates are forwarded to the store unchanged; creation is the
//! only operation that checks the record it writes.

use std::sync::Arc;

use bson::{doc, Document};
use petbook_core::{DeleteSummary, Pet};

use crate::error::GatewayError;
use crate::record;
use crate::store::PetStore;

#[derive(Clone)]
pub struct PetGateway {
    store: Arc<dyn PetStore>,
}

impl PetGateway {
    pub fn new(store: Arc<dyn PetStore>) -> Self {
        Self { store }
    }

    /// Every record matching `filter`, in store order.
    pub async fn read(&self, filter: Document) -> Result<Vec<Pet>, GatewayError> {
        let docs = self.store.find(filter).await?;
        tracing::debug!(count = docs.len(), "read pets");
        decode_all(&docs)
    }

    /// Validate, default, insert, then return the record as stored.
    ///
    /// If the insert went through but the stored copy cannot be read back,
    /// the locally built record is returned without an id.
    pub async fn create(&self, mut pet: Pet) -> Result<Pet, GatewayError> {
        pet.id = None;
        pet.validate()?;
        pet.apply_defaults();

        let id = self.store.insert_one(record::to_document(&pet)).await?;
        tracing::info!(%id, species = %pet.species, "created pet");

        match self.store.find_one(doc! { "_id": id.clone() }).await {
            Ok(Some(stored)) => match record::from_document(&stored) {
                Ok(stored) => Ok(stored),
                Err(err) => {
                    tracing::warn!(%id, error = %err, "could not decode created pet");
                    Ok(pet)
                }
            },
            Ok(None) => {
                tracing::warn!(%id, "created pet not found on re-read");
                Ok(pet)
            }
            Err(err) => {
                tracing::warn!(%id, error = %err, "re-read of created pet failed");
                Ok(pet)
            }
        }
    }

    /// Apply `update` to every record matching `filter`, then return what the
    /// same filter matches afterwards. Updated records that no longer match
    /// are not in the result.
    pub async fn update(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<Vec<Pet>, GatewayError> {
        let summary = self.store.update_many(filter.clone(), update).await?;
        tracing::info!(
            matched = summary.matched,
            modified = summary.modified,
            "updated pets"
        );
        let docs = self.store.find(filter).await?;
        decode_all(&docs)
    }

    /// Delete every record matching `filter`.
    pub async fn delete(&self, filter: Document) -> Result<DeleteSummary, GatewayError> {
        let deleted_count = self.store.delete_many(filter).await?;
        tracing::info!(deleted = deleted_count, "deleted pets");
        Ok(DeleteSummary { deleted_count })
    }
}

fn decode_all(docs: &[Document]) -> Result<Vec<Pet>, GatewayError> {
    docs.iter()
        .map(|d| record::from_document(d).map_err(GatewayError::from))
        .collect()
}
