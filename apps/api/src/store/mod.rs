//! Document store: every portfolio record is kept as a JSON body inside a
//! named collection. `AppState` holds an `Arc<dyn DocumentStore>`, picked at
//! startup: PostgreSQL when `DATABASE_URL` is set, in-memory otherwise.

pub mod memory;
pub mod ordering;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt document: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// One ORDER BY component over a top-level body field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: &'static str,
    pub direction: Direction,
}

impl SortKey {
    pub const fn asc(field: &'static str) -> Self {
        SortKey {
            field,
            direction: Direction::Asc,
        }
    }

    pub const fn desc(field: &'static str) -> Self {
        SortKey {
            field,
            direction: Direction::Desc,
        }
    }
}

/// Equality filters on top-level body fields, an ordering, and an optional cap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub sort: Vec<SortKey>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn sorted(sort: &[SortKey]) -> Self {
        Query {
            sort: sort.to_vec(),
            ..Query::default()
        }
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Filters folded into a single object, the shape jsonb containment expects.
    pub fn filter_object(&self) -> Value {
        let map: Map<String, Value> = self.filters.iter().cloned().collect();
        Value::Object(map)
    }

    pub fn matches(&self, body: &Value) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| body.get(field) == Some(expected))
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct StoredDocument {
    pub id: Uuid,
    pub body: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A whole collection's replacement contents, applied by `reseed`.
#[derive(Debug, Clone)]
pub struct Batch {
    pub collection: &'static str,
    pub documents: Vec<StoredDocument>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<StoredDocument>, StoreError>;

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<StoredDocument>, StoreError>;

    async fn insert(&self, collection: &str, doc: &StoredDocument) -> Result<(), StoreError>;

    /// Sets `flag` to false on every other document of the collection and
    /// inserts `doc`, as one atomic step.
    async fn insert_exclusive(
        &self,
        collection: &str,
        flag: &str,
        doc: &StoredDocument,
    ) -> Result<(), StoreError>;

    /// Overwrites body and `updated_at`. Returns false when the id is unknown.
    async fn replace(&self, collection: &str, doc: &StoredDocument) -> Result<bool, StoreError>;

    /// `replace`, but also clears `flag` on every other document atomically.
    async fn replace_exclusive(
        &self,
        collection: &str,
        flag: &str,
        doc: &StoredDocument,
    ) -> Result<bool, StoreError>;

    /// Returns whether a document was removed.
    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, StoreError>;

    /// Replaces the full contents of each batch's collection in one transaction.
    async fn reseed(&self, batches: &[Batch]) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_object_folds_filters() {
        let query = Query::default()
            .filter("category", "Career")
            .filter("featured", true);
        assert_eq!(
            query.filter_object(),
            json!({"category": "Career", "featured": true})
        );
    }

    #[test]
    fn test_matches_requires_every_filter() {
        let query = Query::default().filter("is_active", true);
        assert!(query.matches(&json!({"is_active": true, "value": "x"})));
        assert!(!query.matches(&json!({"is_active": false})));
        assert!(!query.matches(&json!({"value": "x"})));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(Query::default().matches(&json!({})));
        assert_eq!(Query::default().filter_object(), json!({}));
    }
}
