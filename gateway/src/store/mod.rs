//! Document store abstraction.
//!
//! # Design
//! The gateway only ever talks to `PetStore`, never to a driver directly. The
//! trait mirrors the handful of collection operations the gateway needs and
//! deals in raw BSON documents, so filter and update expressions supplied by
//! clients reach the backend untouched.
//!
//! `MongoStore` is the production backend. `MemoryStore` evaluates a subset of
//! the same query language in-process and backs the test suites.

mod memory;
mod mongo;
mod query;

use async_trait::async_trait;
use bson::{Bson, Document};
use thiserror::Error;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Any failure reported by the store. Surfaced to clients verbatim.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    /// A filter or update expression the store could not evaluate.
    #[error("{0}")]
    Query(String),

    /// A stored document that does not have the shape of a pet record.
    #[error("error decoding document: {0}")]
    Decode(String),
}

/// Counts reported by a bulk update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub matched: u64,
    pub modified: u64,
}

#[async_trait]
pub trait PetStore: Send + Sync {
    /// All documents matching `filter`, in store order.
    async fn find(&self, filter: Document) -> Result<Vec<Document>, StoreError>;

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, StoreError>;

    /// Insert `doc` and return the identifier the store assigned.
    async fn insert_one(&self, doc: Document) -> Result<Bson, StoreError>;

    async fn update_many(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<UpdateSummary, StoreError>;

    /// Delete every document matching `filter` and return how many went.
    async fn delete_many(&self, filter: Document) -> Result<u64, StoreError>;
}
