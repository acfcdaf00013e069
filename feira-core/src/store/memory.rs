use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::factory::{StoreConfig, StoreFactory};
use super::repository::{KeyValueStore, StoreError};

/// Process-local [`KeyValueStore`]. Clones share the same slots, which lets
/// a test keep a handle on the data after handing the store to a
/// persistence adapter.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with a single slot.
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut slots) = store.slots.write() {
            slots.insert(key.into(), value.into());
        }
        store
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("memory store lock poisoned".to_string())
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let slots = self.slots.read().map_err(poisoned)?;
        Ok(slots.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut slots = self.slots.write().map_err(poisoned)?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// [`StoreFactory`] for the `"memory"` backend. The connection string is
/// ignored; every `create` returns a new, empty store.
pub struct MemoryStoreFactory;

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, _config: &StoreConfig) -> Result<Box<dyn KeyValueStore>, StoreError> {
        Ok(Box::new(MemoryStore::new()))
    }
}
