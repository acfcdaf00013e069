use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use feira_core::store::{KeyValueStore, StoreError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// [`KeyValueStore`] backed by a single SQLite table.
///
/// The pool holds one connection: the store has one logical writer, and an
/// in-memory database lives exactly as long as its connection.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens `connection_string`, creating the database file if missing.
    ///
    /// Accepts a bare path (`feira.db`), a sqlx URL (`sqlite:feira.db`) or
    /// `:memory:`.
    pub async fn new(connection_string: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(connection_string)
            .map_err(|e| {
                StoreError::Configuration(format!(
                    "invalid SQLite connection string '{connection_string}': {e}"
                ))
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(format!("failed to run migrations: {e}")))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(row.map(|(value,)| value))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        // A single upsert statement, so readers never see a half-written slot.
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        tracing::trace!(key, bytes = value.len(), "kv slot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    async fn setup_test_store() -> SqliteStore {
        let store = SqliteStore::new(":memory:")
            .await
            .expect("Failed to create in-memory database");
        store.run_migrations().await.expect("Failed to run migrations");
        store
    }

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let store = setup_test_store().await;

        assert_eq!(store.get_item("@FeiraApp:lista").await, Ok(None));
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = setup_test_store().await;

        store.set_item("k", "[]").await.expect("Should write slot");

        assert_eq!(store.get_item("k").await, Ok(Some("[]".to_string())));
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_value() {
        let store = setup_test_store().await;

        store.set_item("k", "first").await.expect("Should write slot");
        store.set_item("k", "second").await.expect("Should overwrite slot");

        assert_eq!(store.get_item("k").await, Ok(Some("second".to_string())));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM kv_store")
            .fetch_one(store.pool())
            .await
            .expect("Should count rows");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = setup_test_store().await;

        store.set_item("a:lista", "A").await.unwrap();
        store.set_item("b:lista", "B").await.unwrap();

        assert_eq!(store.get_item("a:lista").await, Ok(Some("A".to_string())));
        assert_eq!(store.get_item("b:lista").await, Ok(Some("B".to_string())));
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("feira.db");
        let path = path.to_str().expect("temp path is UTF-8");

        {
            let store = SqliteStore::new(path).await.expect("Should create file database");
            store.run_migrations().await.unwrap();
            store.set_item("k", "persisted").await.unwrap();
            store.pool().close().await;
        }

        let reopened = SqliteStore::new(path).await.expect("Should reopen file database");
        reopened.run_migrations().await.unwrap();

        assert_eq!(reopened.get_item("k").await, Ok(Some("persisted".to_string())));
    }
}
