use async_trait::async_trait;

use feira_core::store::{KeyValueStore, StoreConfig, StoreError, StoreFactory};

use crate::repository::SqliteStore;

/// [`StoreFactory`] for SQLite.
///
/// Register this with a [`feira_core::store::StoreRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use feira_core::store::StoreRegistry;
/// use feira_store_sqlite::SqliteStoreFactory;
///
/// let mut registry = StoreRegistry::new();
/// registry.register(Box::new(SqliteStoreFactory));
/// ```
pub struct SqliteStoreFactory;

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string` and run
    /// migrations.
    ///
    /// Accepted connection-string values:
    /// * A bare file path, e.g. `"feira.db"`. The file is created if it
    ///   does not exist.
    /// * `":memory:"`, an ephemeral in-memory database (useful for tests).
    async fn create(&self, config: &StoreConfig) -> Result<Box<dyn KeyValueStore>, StoreError> {
        let store = SqliteStore::new(&config.connection_string).await?;
        store.run_migrations().await?;
        tracing::info!(database = %config.connection_string, "sqlite store ready");
        Ok(Box::new(store))
    }
}
