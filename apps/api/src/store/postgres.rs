use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use super::{Batch, Direction, DocumentStore, Query, SortKey, StoreError, StoredDocument};

/// PostgreSQL backend. All collections share the `documents` table; bodies
/// live in a jsonb column so filters use containment (`@>`) and sorting uses
/// jsonb ordering on `body -> 'field'`.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        PgDocumentStore { pool }
    }
}

/// Field names are interpolated into ORDER BY, so only plain identifiers pass.
fn checked_field(field: &str) -> Result<&str, StoreError> {
    let valid = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(field)
    } else {
        Err(StoreError::Corrupt(format!("illegal sort field '{field}'")))
    }
}

fn order_clause(keys: &[SortKey]) -> Result<String, StoreError> {
    let mut parts = Vec::with_capacity(keys.len() + 2);
    for key in keys {
        let direction = match key.direction {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        };
        parts.push(format!("body -> '{}' {direction}", checked_field(key.field)?));
    }
    parts.push("created_at ASC".to_string());
    parts.push("id ASC".to_string());
    Ok(parts.join(", "))
}

fn select_sql(query: &Query) -> Result<String, StoreError> {
    let mut sql = format!(
        "SELECT id, body, created_at, updated_at FROM documents \
         WHERE collection = $1 AND body @> $2 ORDER BY {}",
        order_clause(&query.sort)?
    );
    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    Ok(sql)
}

async fn insert_in(
    tx: &mut Transaction<'_, Postgres>,
    collection: &str,
    doc: &StoredDocument,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO documents (id, collection, body, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(doc.id)
    .bind(collection)
    .bind(&doc.body)
    .bind(doc.created_at)
    .bind(doc.updated_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Serialises exclusive writers of one collection for the rest of the transaction.
async fn lock_collection(tx: &mut Transaction<'_, Postgres>, collection: &str) -> Result<(), StoreError> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(collection)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn clear_flag_in(
    tx: &mut Transaction<'_, Postgres>,
    collection: &str,
    flag: &str,
    except: Option<Uuid>,
    doc: &StoredDocument,
) -> Result<u64, StoreError> {
    let result = sqlx::query(
        "UPDATE documents \
         SET body = jsonb_set(body, ARRAY[$2::text], 'false'::jsonb), updated_at = $3 \
         WHERE collection = $1 AND body @> jsonb_build_object($2::text, true) \
           AND ($4::uuid IS NULL OR id <> $4)",
    )
    .bind(collection)
    .bind(flag)
    .bind(doc.updated_at)
    .bind(except)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected())
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<StoredDocument>, StoreError> {
        let sql = select_sql(query)?;
        Ok(sqlx::query_as::<_, StoredDocument>(&sql)
            .bind(collection)
            .bind(query.filter_object())
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<StoredDocument>, StoreError> {
        Ok(sqlx::query_as::<_, StoredDocument>(
            "SELECT id, body, created_at, updated_at FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert(&self, collection: &str, doc: &StoredDocument) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO documents (id, collection, body, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(doc.id)
        .bind(collection)
        .bind(&doc.body)
        .bind(doc.created_at)
        .bind(doc.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_exclusive(
        &self,
        collection: &str,
        flag: &str,
        doc: &StoredDocument,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        lock_collection(&mut tx, collection).await?;
        let cleared = clear_flag_in(&mut tx, collection, flag, None, doc).await?;
        insert_in(&mut tx, collection, doc).await?;
        tx.commit().await?;
        debug!("Inserted {collection}/{} after clearing '{flag}' on {cleared} documents", doc.id);
        Ok(())
    }

    async fn replace(&self, collection: &str, doc: &StoredDocument) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE documents SET body = $3, updated_at = $4 WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(doc.id)
        .bind(&doc.body)
        .bind(doc.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_exclusive(
        &self,
        collection: &str,
        flag: &str,
        doc: &StoredDocument,
    ) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;
        lock_collection(&mut tx, collection).await?;

        let exists: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM documents WHERE collection = $1 AND id = $2 FOR UPDATE",
        )
        .bind(collection)
        .bind(doc.id)
        .fetch_optional(&mut *tx)
        .await?;
        if exists.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        clear_flag_in(&mut tx, collection, flag, Some(doc.id), doc).await?;
        sqlx::query("UPDATE documents SET body = $3, updated_at = $4 WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(doc.id)
            .bind(&doc.body)
            .bind(doc.updated_at)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn reseed(&self, batches: &[Batch]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for batch in batches {
            sqlx::query("DELETE FROM documents WHERE collection = $1")
                .bind(batch.collection)
                .execute(&mut *tx)
                .await?;
            for doc in &batch.documents {
                insert_in(&mut tx, batch.collection, doc).await?;
            }
        }
        tx.commit().await?;
        Ok(())
    }
}
