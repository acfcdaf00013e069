pub mod calculations;
pub mod controller;
pub mod list;
pub mod models;
pub mod parse;
pub mod persistence;
pub mod report;
pub mod store;

pub use controller::ListController;
pub use list::{ShoppingList, total_of};
pub use models::*;
pub use persistence::{DEFAULT_NAMESPACE, ListPersistence, PersistenceError, storage_key};
pub use report::{Report, ReportError, ReportLabels, generate_report, generate_report_with};
pub use store::{KeyValueStore, StoreConfig, StoreError, StoreRegistry};
