use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Backend(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Durable string slots addressed by key, in the shape of a mobile
/// async key-value storage.
///
/// `set_item` must replace the whole value in one step: a concurrent
/// `get_item` sees either the old value or the new one.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, or `None` when the slot is empty.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrites the slot.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
