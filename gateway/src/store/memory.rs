//! In-memory store evaluating the store query language over plain documents.
//!
//! Documents are kept in insertion order, which is the order `find` returns
//! them in. Bulk updates are all-or-nothing: every matched document is
//! rewritten off to the side and the batch is committed only if all of them
//! succeeded.

use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use tokio::sync::RwLock;

use super::query::{Filter, Update};
use super::{PetStore, StoreError, UpdateSummary};

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    docs: Arc<RwLock<Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

#[async_trait]
impl PetStore for MemoryStore {
    async fn find(&self, filter: Document) -> Result<Vec<Document>, StoreError> {
        let filter = Filter::compile(&filter)?;
        let docs = self.docs.read().await;
        Ok(docs.iter().filter(|d| filter.matches(d)).cloned().collect())
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, StoreError> {
        let filter = Filter::compile(&filter)?;
        let docs = self.docs.read().await;
        Ok(docs.iter().find(|d| filter.matches(d)).cloned())
    }

    async fn insert_one(&self, mut doc: Document) -> Result<Bson, StoreError> {
        let mut docs = self.docs.write().await;
        let id = match doc.get("_id") {
            Some(id) => id.clone(),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                doc.insert("_id", id.clone());
                id
            }
        };
        if docs.iter().any(|d| d.get("_id") == Some(&id)) {
            return Err(StoreError::Query(format!(
                "E11000 duplicate key error collection: _id dup key: {{ _id: {id} }}"
            )));
        }
        docs.push(doc);
        Ok(id)
    }

    async fn update_many(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<UpdateSummary, StoreError> {
        let filter = Filter::compile(&filter)?;
        let update = Update::compile(&update)?;
        let mut docs = self.docs.write().await;

        let mut rewritten = Vec::new();
        for (index, doc) in docs.iter().enumerate() {
            if filter.matches(doc) {
                rewritten.push((index, update.apply(doc)?));
            }
        }

        let mut summary = UpdateSummary {
            matched: rewritten.len() as u64,
            modified: 0,
        };
        for (index, next) in rewritten {
            if docs[index] != next {
                docs[index] = next;
                summary.modified += 1;
            }
        }
        Ok(summary)
    }

    async fn delete_many(&self, filter: Document) -> Result<u64, StoreError> {
        let filter = Filter::compile(&filter)?;
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|d| !filter.matches(d));
        Ok((before - docs.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        for (name, species, height) in [("Rex", "dog", 50), ("Tom", "cat", 25), ("Fido", "dog", 35)] {
            store
                .insert_one(doc! { "name": name, "species": species, "height": height })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn insert_assigns_object_id() {
        let store = MemoryStore::new();
        let id = store.insert_one(doc! { "name": "Rex" }).await.unwrap();
        assert!(matches!(id, Bson::ObjectId(_)));

        let found = store.find_one(doc! { "_id": id.clone() }).await.unwrap().unwrap();
        assert_eq!(found.get("_id"), Some(&id));
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let store = MemoryStore::new();
        store.insert_one(doc! { "_id": 1, "name": "Rex" }).await.unwrap();
        let err = store.insert_one(doc! { "_id": 1 }).await.unwrap_err();
        assert!(err.to_string().contains("duplicate key"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn find_keeps_insertion_order() {
        let store = seeded().await;
        let dogs = store.find(doc! { "species": "dog" }).await.unwrap();
        let names: Vec<_> = dogs.iter().map(|d| d.get_str("name").unwrap()).collect();
        assert_eq!(names, ["Rex", "Fido"]);
    }

    #[tokio::test]
    async fn update_counts_matched_and_modified() {
        let store = seeded().await;
        let summary = store
            .update_many(doc! { "species": "dog" }, doc! { "$set": { "height": 50 } })
            .await
            .unwrap();
        assert_eq!(summary, UpdateSummary { matched: 2, modified: 1 });
    }

    #[tokio::test]
    async fn failed_update_changes_nothing() {
        let store = seeded().await;
        store
            .insert_one(doc! { "name": "Odd", "species": "dog", "height": "tall" })
            .await
            .unwrap();
        let err = store
            .update_many(doc! { "species": "dog" }, doc! { "$inc": { "height": 1 } })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));

        let rex = store.find_one(doc! { "name": "Rex" }).await.unwrap().unwrap();
        assert_eq!(rex.get_i32("height").unwrap(), 50);
    }

    #[tokio::test]
    async fn invalid_filter_fails_on_empty_collection() {
        let store = MemoryStore::new();
        let err = store.find(doc! { "height": { "$bogus": 1 } }).await.unwrap_err();
        assert_eq!(err.to_string(), "unknown operator: $bogus");
    }

    #[tokio::test]
    async fn delete_reports_count() {
        let store = seeded().await;
        assert_eq!(store.delete_many(doc! { "species": "dog" }).await.unwrap(), 2);
        assert_eq!(store.delete_many(doc! { "species": "dog" }).await.unwrap(), 0);
        assert_eq!(store.len().await, 1);
    }
}
