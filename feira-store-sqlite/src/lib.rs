//! SQLite backend for the shopping-list key-value store.

mod factory;
mod repository;

pub use factory::SqliteStoreFactory;
pub use repository::SqliteStore;
