pub mod factory;
mod memory;
pub mod repository;

pub use factory::{StoreConfig, StoreFactory, StoreRegistry};
pub use memory::{MemoryStore, MemoryStoreFactory};
pub use repository::{KeyValueStore, StoreError};
