//! MongoDB-backed store.

use async_trait::async_trait;
use bson::{Bson, Document};
use futures_util::TryStreamExt;
use mongodb::{Client, Collection};

use super::{PetStore, StoreError, UpdateSummary};

/// A handle to one collection. Cloning is cheap; the driver pools
/// connections internally.
#[derive(Clone, Debug)]
pub struct MongoStore {
    collection: Collection<Document>,
}

impl MongoStore {
    /// Connect to `uri` and bind to `database`.`collection`.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self::from_collection(
            client.database(database).collection(collection),
        ))
    }

    pub fn from_collection(collection: Collection<Document>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl PetStore for MongoStore {
    async fn find(&self, filter: Document) -> Result<Vec<Document>, StoreError> {
        let cursor = self.collection.find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, StoreError> {
        Ok(self.collection.find_one(filter).await?)
    }

    async fn insert_one(&self, doc: Document) -> Result<Bson, StoreError> {
        let result = self.collection.insert_one(doc).await?;
        Ok(result.inserted_id)
    }

    async fn update_many(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<UpdateSummary, StoreError> {
        let result = self.collection.update_many(filter, update).await?;
        Ok(UpdateSummary {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_many(&self, filter: Document) -> Result<u64, StoreError> {
        let result = self.collection.delete_many(filter).await?;
        Ok(result.deleted_count)
    }
}
