use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::ordering::compare_documents;
use super::{Batch, DocumentStore, Query, StoreError, StoredDocument};

/// Process-local store used for local development without PostgreSQL and
/// by the router tests. Each write holds the lock for its whole duration,
/// so the exclusive operations are atomic with respect to other requests.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn clear_flag(docs: &mut [StoredDocument], flag: &str, except: Option<Uuid>, now: DateTime<Utc>) {
    for doc in docs.iter_mut() {
        if Some(doc.id) == except {
            continue;
        }
        if doc.body.get(flag) == Some(&Value::Bool(true)) {
            if let Some(body) = doc.body.as_object_mut() {
                body.insert(flag.to_string(), Value::Bool(false));
            }
            doc.updated_at = now;
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<StoredDocument>, StoreError> {
        let collections = self.collections.read().await;
        let mut docs: Vec<StoredDocument> = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| query.matches(&d.body)).cloned().collect())
            .unwrap_or_default();
        docs.sort_by(|a, b| compare_documents(a, b, &query.sort));
        if let Some(limit) = query.limit {
            docs.truncate(limit);
        }
        Ok(docs)
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<StoredDocument>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned()))
    }

    async fn insert(&self, collection: &str, doc: &StoredDocument) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());
        Ok(())
    }

    async fn insert_exclusive(
        &self,
        collection: &str,
        flag: &str,
        doc: &StoredDocument,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        clear_flag(docs, flag, None, doc.updated_at);
        docs.push(doc.clone());
        Ok(())
    }

    async fn replace(&self, collection: &str, doc: &StoredDocument) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(existing) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == doc.id))
        else {
            return Ok(false);
        };
        existing.body = doc.body.clone();
        existing.updated_at = doc.updated_at;
        Ok(true)
    }

    async fn replace_exclusive(
        &self,
        collection: &str,
        flag: &str,
        doc: &StoredDocument,
    ) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let Some(position) = docs.iter().position(|d| d.id == doc.id) else {
            return Ok(false);
        };
        clear_flag(docs, flag, Some(doc.id), doc.updated_at);
        docs[position].body = doc.body.clone();
        docs[position].updated_at = doc.updated_at;
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|d| d.id != id);
        Ok(docs.len() != before)
    }

    async fn reseed(&self, batches: &[Batch]) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        for batch in batches {
            collections.insert(batch.collection.to_string(), batch.documents.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SortKey;
    use serde_json::json;

    fn doc(body: Value) -> StoredDocument {
        let now = Utc::now();
        StoredDocument {
            id: Uuid::new_v4(),
            body,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_find_filters_and_sorts() {
        let store = MemoryDocumentStore::new();
        store.insert("dreams", &doc(json!({"category": "Travel", "order_index": 2}))).await.unwrap();
        store.insert("dreams", &doc(json!({"category": "Career", "order_index": 3}))).await.unwrap();
        store.insert("dreams", &doc(json!({"category": "Travel", "order_index": 1}))).await.unwrap();

        let query = Query::sorted(&[SortKey::asc("order_index")]).filter("category", "Travel");
        let found = store.find("dreams", &query).await.unwrap();
        let order: Vec<_> = found.iter().map(|d| d.body["order_index"].clone()).collect();
        assert_eq!(order, vec![json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn test_find_on_unknown_collection_is_empty() {
        let store = MemoryDocumentStore::new();
        assert!(store.find("skills", &Query::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_limit_truncates_after_sorting() {
        let store = MemoryDocumentStore::new();
        for i in [3, 1, 2] {
            store.insert("cv", &doc(json!({"n": i}))).await.unwrap();
        }
        let found = store
            .find("cv", &Query::sorted(&[SortKey::desc("n")]).limit(1))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].body["n"], json!(3));
    }

    #[tokio::test]
    async fn test_insert_exclusive_clears_flag_on_others() {
        let store = MemoryDocumentStore::new();
        let first = doc(json!({"is_active": true}));
        store.insert("cv", &first).await.unwrap();
        let second = doc(json!({"is_active": true}));
        store.insert_exclusive("cv", "is_active", &second).await.unwrap();

        let first = store.find_by_id("cv", first.id).await.unwrap().unwrap();
        let second = store.find_by_id("cv", second.id).await.unwrap().unwrap();
        assert_eq!(first.body["is_active"], json!(false));
        assert_eq!(second.body["is_active"], json!(true));
    }

    #[tokio::test]
    async fn test_replace_exclusive_keeps_target_and_clears_rest() {
        let store = MemoryDocumentStore::new();
        let a = doc(json!({"is_active": true}));
        let mut b = doc(json!({"is_active": false}));
        store.insert("cv", &a).await.unwrap();
        store.insert("cv", &b).await.unwrap();

        b.body = json!({"is_active": true});
        assert!(store.replace_exclusive("cv", "is_active", &b).await.unwrap());

        let active = store
            .find("cv", &Query::default().filter("is_active", true))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, b.id);
    }

    #[tokio::test]
    async fn test_replace_exclusive_unknown_id_changes_nothing() {
        let store = MemoryDocumentStore::new();
        let a = doc(json!({"is_active": true}));
        store.insert("cv", &a).await.unwrap();

        let stranger = doc(json!({"is_active": true}));
        assert!(!store.replace_exclusive("cv", "is_active", &stranger).await.unwrap());
        let a = store.find_by_id("cv", a.id).await.unwrap().unwrap();
        assert_eq!(a.body["is_active"], json!(true));
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = MemoryDocumentStore::new();
        let d = doc(json!({}));
        store.insert("skills", &d).await.unwrap();
        assert!(store.delete("skills", d.id).await.unwrap());
        assert!(!store.delete("skills", d.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_reseed_replaces_only_named_collections() {
        let store = MemoryDocumentStore::new();
        store.insert("skills", &doc(json!({"name": "old"}))).await.unwrap();
        store.insert("cv", &doc(json!({"pdf_url": "keep"}))).await.unwrap();

        store
            .reseed(&[Batch {
                collection: "skills",
                documents: vec![doc(json!({"name": "new"}))],
            }])
            .await
            .unwrap();

        let skills = store.find("skills", &Query::default()).await.unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].body["name"], json!("new"));
        assert_eq!(store.find("cv", &Query::default()).await.unwrap().len(), 1);
    }
}
