//! Storage for the saved schema document, keyed by storage key.

use super::Pool;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sqlx::Row;
use std::sync::Arc;

/// A saved schema document.
#[derive(Debug, Clone)]
pub struct StoredSchema {
    pub body: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for StoredSchema {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(StoredSchema {
            body: row.try_get("body")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Where saved schemas live.
///
/// PostgreSQL when a database is configured, otherwise a process-local map
/// that is lost on restart.
#[derive(Debug, Clone)]
pub enum SchemaStore {
    Postgres(Pool),
    Memory(Arc<DashMap<String, StoredSchema>>),
}

impl SchemaStore {
    /// An empty in-memory store.
    pub fn memory() -> Self {
        SchemaStore::Memory(Arc::new(DashMap::new()))
    }

    /// Short name of the backend, for logs.
    pub fn backend(&self) -> &'static str {
        match self {
            SchemaStore::Postgres(_) => "postgres",
            SchemaStore::Memory(_) => "memory",
        }
    }

    /// Fetch the document stored under `key`.
    pub async fn load(&self, key: &str) -> Result<Option<StoredSchema>, sqlx::Error> {
        match self {
            SchemaStore::Postgres(pool) => {
                sqlx::query_as::<_, StoredSchema>(
                    "SELECT body, updated_at FROM form_schemas WHERE storage_key = $1",
                )
                .bind(key)
                .fetch_optional(pool)
                .await
            }
            SchemaStore::Memory(map) => Ok(map.get(key).map(|entry| entry.value().clone())),
        }
    }

    /// Store `body` under `key`, replacing any previous document.
    pub async fn save(
        &self,
        key: &str,
        body: &serde_json::Value,
    ) -> Result<DateTime<Utc>, sqlx::Error> {
        match self {
            SchemaStore::Postgres(pool) => {
                sqlx::query_scalar::<_, DateTime<Utc>>(
                    r#"
                    INSERT INTO form_schemas (storage_key, body, updated_at)
                    VALUES ($1, $2, now())
                    ON CONFLICT (storage_key) DO UPDATE
                    SET body = EXCLUDED.body, updated_at = EXCLUDED.updated_at
                    RETURNING updated_at
                    "#,
                )
                .bind(key)
                .bind(body)
                .fetch_one(pool)
                .await
            }
            SchemaStore::Memory(map) => {
                let updated_at = Utc::now();
                map.insert(
                    key.to_string(),
                    StoredSchema {
                        body: body.clone(),
                        updated_at,
                    },
                );
                Ok(updated_at)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = SchemaStore::memory();
        assert!(store.load("form-builder-schema").await.unwrap().is_none());

        let body = json!({"id": "form-1", "name": "A", "sections": []});
        store.save("form-builder-schema", &body).await.unwrap();
        let stored = store.load("form-builder-schema").await.unwrap().unwrap();
        assert_eq!(stored.body, body);

        let replaced = json!({"id": "form-1", "name": "B", "sections": []});
        store.save("form-builder-schema", &replaced).await.unwrap();
        let stored = store.load("form-builder-schema").await.unwrap().unwrap();
        assert_eq!(stored.body["name"], "B");
        assert!(store.load("other-key").await.unwrap().is_none());
    }
}
