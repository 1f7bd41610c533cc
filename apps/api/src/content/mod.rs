//! Typed access to the portfolio collections.
//!
//! Handlers never touch `StoredDocument` directly: everything goes through
//! these functions, which own validation, timestamps and the single-active
//! CV rule.

pub mod listing;
pub mod seed;

use serde_json::{Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{dates, decode, writable_fields, Cv, Document, Record};
use crate::store::{DocumentStore, Query};

pub use listing::{
    group_skills, list_achievements, list_contacts, list_dreams, list_objectives, list_projects,
    list_skills, snapshot, PortfolioSnapshot, SkillGroups,
};

/// Ids that are not UUIDs cannot exist in the store.
fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

pub async fn list<T: Document>(store: &dyn DocumentStore, query: Query) -> Result<Vec<Record<T>>, AppError> {
    let docs = store.find(T::COLLECTION, &query).await?;
    docs.into_iter()
        .map(|doc| Record::from_stored(doc).map_err(AppError::from))
        .collect()
}

pub async fn get<T: Document>(store: &dyn DocumentStore, id: &str) -> Result<Record<T>, AppError> {
    let id = parse_id(id).ok_or_else(|| AppError::not_found(T::LABEL))?;
    let doc = store
        .find_by_id(T::COLLECTION, id)
        .await?
        .ok_or_else(|| AppError::not_found(T::LABEL))?;
    Ok(Record::from_stored(doc)?)
}

/// Validates `payload`, assigns id and timestamps, and persists the record.
/// Collections with an exclusive flag clear it on every existing document first.
pub async fn create<T: Document>(store: &dyn DocumentStore, payload: Value) -> Result<Record<T>, AppError> {
    let fields: T = decode(writable_fields::<T>(payload)?)?;
    let stored = Record::new(fields).to_stored()?;

    match T::EXCLUSIVE_FLAG {
        Some(flag) => store.insert_exclusive(T::COLLECTION, flag, &stored).await?,
        None => store.insert(T::COLLECTION, &stored).await?,
    }

    info!("Created {} {}", T::COLLECTION, stored.id);
    Ok(Record::from_stored(stored)?)
}

/// Overlays the top-level fields of `patch` on the stored record, then
/// re-validates the merged result. Fields absent from `patch` are untouched.
pub async fn update<T: Document>(
    store: &dyn DocumentStore,
    id: &str,
    patch: Value,
) -> Result<Record<T>, AppError> {
    let id = parse_id(id).ok_or_else(|| AppError::not_found(T::LABEL))?;
    let patch = writable_fields::<T>(patch)?;
    let existing = store
        .find_by_id(T::COLLECTION, id)
        .await?
        .ok_or_else(|| AppError::not_found(T::LABEL))?;

    let mut merged: Map<String, Value> = match existing.body {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    merged.extend(patch);
    let fields: T = decode(merged)?;

    let stored = Record {
        id,
        fields,
        created_at: existing.created_at,
        updated_at: dates::now(),
    }
    .to_stored()?;

    let exclusive = T::EXCLUSIVE_FLAG.filter(|flag| stored.body.get(*flag) == Some(&Value::Bool(true)));
    let found = match exclusive {
        Some(flag) => store.replace_exclusive(T::COLLECTION, flag, &stored).await?,
        None => store.replace(T::COLLECTION, &stored).await?,
    };
    if !found {
        // Deleted between the read and the write.
        return Err(AppError::not_found(T::LABEL));
    }

    info!("Updated {} {}", T::COLLECTION, id);
    Ok(Record::from_stored(stored)?)
}

/// Idempotent: removing an unknown or malformed id succeeds without effect.
pub async fn delete<T: Document>(store: &dyn DocumentStore, id: &str) -> Result<(), AppError> {
    let Some(id) = parse_id(id) else {
        debug!("Ignoring delete of malformed {} id '{id}'", T::COLLECTION);
        return Ok(());
    };
    if store.delete(T::COLLECTION, id).await? {
        info!("Deleted {} {}", T::COLLECTION, id);
    } else {
        debug!("Delete of absent {} {} is a no-op", T::COLLECTION, id);
    }
    Ok(())
}

/// Creates a CV and makes it the only active one, atomically.
pub async fn create_cv(store: &dyn DocumentStore, payload: Value) -> Result<Record<Cv>, AppError> {
    create::<Cv>(store, payload).await
}

/// The most recently uploaded active CV, if any.
pub async fn active_cv(store: &dyn DocumentStore) -> Result<Option<Record<Cv>>, AppError> {
    let query = Query::sorted(Cv::SORT).filter("is_active", true).limit(1);
    Ok(list::<Cv>(store, query).await?.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Achievement, Project, Skill};
    use crate::store::MemoryDocumentStore;
    use serde_json::json;

    fn store() -> MemoryDocumentStore {
        MemoryDocumentStore::new()
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_record() {
        let store = store();
        let created = create::<Project>(
            &store,
            json!({
                "title": "Weather Dashboard",
                "description": "Forecasts",
                "technologies": ["JavaScript"],
                "featured": true,
                "order_index": 3
            }),
        )
        .await
        .unwrap();

        let fetched = get::<Project>(&store, &created.id.to_string()).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.fields.technologies, vec!["JavaScript".to_string()]);
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    async fn test_invalid_create_persists_nothing() {
        let store = store();
        let err = create::<Skill>(&store, json!({"name": "Go", "category": "Cloud", "proficiency_level": 1}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(list::<Skill>(&store, Query::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_client_supplied_id_is_ignored() {
        let store = store();
        let forced = Uuid::new_v4();
        let created = create::<Skill>(
            &store,
            json!({"id": forced, "name": "Go", "category": "Backend", "proficiency_level": 80}),
        )
        .await
        .unwrap();
        assert_ne!(created.id, forced);
    }

    #[tokio::test]
    async fn test_update_keeps_unspecified_fields() {
        let store = store();
        let created = create::<Skill>(
            &store,
            json!({"name": "Go", "category": "Backend", "proficiency_level": 80, "icon_url": "go.svg"}),
        )
        .await
        .unwrap();

        let updated = update::<Skill>(&store, &created.id.to_string(), json!({"proficiency_level": 90}))
            .await
            .unwrap();
        assert_eq!(updated.fields.proficiency_level, 90);
        assert_eq!(updated.fields.icon_url, "go.svg");
        assert_eq!(updated.fields.name, "Go");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_revalidates_merged_record() {
        let store = store();
        let created = create::<Skill>(&store, json!({"name": "Go", "category": "Backend", "proficiency_level": 80}))
            .await
            .unwrap();
        let err = update::<Skill>(&store, &created.id.to_string(), json!({"category": "Cloud"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let unchanged = get::<Skill>(&store, &created.id.to_string()).await.unwrap();
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = store();
        let err = update::<Skill>(&store, &Uuid::new_v4().to_string(), json!({"name": "Go"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Skill not found"));

        let err = update::<Skill>(&store, "not-a-uuid", json!({"name": "Go"})).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = store();
        let created = create::<Achievement>(&store, json!({"title": "Won", "description": "x"}))
            .await
            .unwrap();
        let id = created.id.to_string();
        delete::<Achievement>(&store, &id).await.unwrap();
        delete::<Achievement>(&store, &id).await.unwrap();
        delete::<Achievement>(&store, "garbage").await.unwrap();
        assert!(matches!(get::<Achievement>(&store, &id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_second_cv_deactivates_first() {
        let store = store();
        let first = create_cv(&store, json!({"pdf_url": "https://cdn/one.pdf"})).await.unwrap();
        let second = create_cv(&store, json!({"pdf_url": "https://cdn/two.pdf"})).await.unwrap();

        let active = active_cv(&store).await.unwrap().unwrap();
        assert_eq!(active.id, second.id);
        let first = get::<Cv>(&store, &first.id.to_string()).await.unwrap();
        assert!(!first.fields.is_active);
    }

    #[tokio::test]
    async fn test_reactivating_cv_through_update_keeps_single_active() {
        let store = store();
        let first = create_cv(&store, json!({"pdf_url": "https://cdn/one.pdf"})).await.unwrap();
        let second = create_cv(&store, json!({"pdf_url": "https://cdn/two.pdf"})).await.unwrap();

        update::<Cv>(&store, &first.id.to_string(), json!({"is_active": true}))
            .await
            .unwrap();

        let active = list::<Cv>(&store, Query::default().filter("is_active", true)).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, first.id);
        let second = get::<Cv>(&store, &second.id.to_string()).await.unwrap();
        assert!(!second.fields.is_active);
    }

    #[tokio::test]
    async fn test_active_cv_none_when_empty() {
        assert!(active_cv(&store()).await.unwrap().is_none());
    }
}
