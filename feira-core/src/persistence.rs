//! Loads and saves the shopping list as one JSON blob in a key-value slot.
//!
//! ## Stored format
//!
//! ```json
//! [
//!   {
//!     "id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
//!     "nome": "Rice",
//!     "quantidade": 2,
//!     "valorUnitario": 5.5,
//!     "valorPorQuantidade": 5.5,
//!     "valorTotal": 11
//!   }
//! ]
//! ```
//!
//! Only `id`, `nome`, `quantidade` and `valorUnitario` are read back; the two
//! derived fields are written for compatibility and recomputed on load.
//! Numeric fields may also arrive as numeric strings, which are coerced the
//! same way user input is.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Item, StoredItem};
use crate::store::{KeyValueStore, StoreError};

/// Namespace of the storage key when none is configured.
pub const DEFAULT_NAMESPACE: &str = "@FeiraApp";

/// Builds the storage key for a namespace: `"<namespace>:lista"`.
pub fn storage_key(namespace: &str) -> String {
    format!("{namespace}:lista")
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Serde-compatible record that mirrors the JSON layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct ItemRecord {
    #[serde(default)]
    id: String,
    #[serde(rename = "nome", default)]
    name: String,
    #[serde(rename = "quantidade", with = "json_amount", default)]
    quantity: Decimal,
    #[serde(rename = "valorUnitario", with = "json_amount", default)]
    unit_price: Decimal,
    #[serde(rename = "valorPorQuantidade", with = "json_amount", default)]
    price_per_quantity: Decimal,
    #[serde(rename = "valorTotal", with = "json_amount", default)]
    total: Decimal,
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id().to_string(),
            name: item.name().to_string(),
            quantity: item.quantity(),
            unit_price: item.unit_price(),
            price_per_quantity: item.price_per_quantity(),
            total: item.total(),
        }
    }
}

impl From<ItemRecord> for StoredItem {
    fn from(record: ItemRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            quantity: record.quantity,
            unit_price: record.unit_price,
        }
    }
}

/// Decimal amounts as plain JSON numbers (`2`, `5.5`) instead of the
/// string form `rust_decimal` uses by default.
///
/// `serde_json` is built with `arbitrary_precision`, so a `Number` keeps the
/// exact digits both ways and no amount passes through an `f64`.
mod json_amount {
    use rust_decimal::Decimal;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::{Number, Value};

    use crate::parse::{clamp_amount, coerce_decimal};

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let number: Number = value
            .normalize()
            .to_string()
            .parse()
            .map_err(|e| S::Error::custom(format!("amount {value} is not a JSON number: {e}")))?;
        number.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = match Value::deserialize(deserializer)? {
            Value::Number(n) => coerce_decimal(&n.to_string()),
            Value::String(s) => coerce_decimal(&s),
            _ => Decimal::ZERO,
        };
        Ok(clamp_amount(amount))
    }
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Persistence adapter: one key in one [`KeyValueStore`].
pub struct ListPersistence {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl ListPersistence {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Adapter bound to `"<namespace>:lista"`.
    pub fn with_namespace(store: Box<dyn KeyValueStore>, namespace: &str) -> Self {
        Self::new(store, storage_key(namespace))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the stored list. An empty slot is an empty list, not an error.
    ///
    /// # Errors
    /// * [`PersistenceError::Store`]: the store could not be read.
    /// * [`PersistenceError::Serialization`]: the slot does not hold a JSON
    ///   array of items.
    pub async fn load(&self) -> Result<Vec<Item>, PersistenceError> {
        let Some(blob) = self.store.get_item(&self.key).await? else {
            tracing::info!(key = %self.key, "no stored list, starting empty");
            return Ok(Vec::new());
        };

        let records: Vec<ItemRecord> = serde_json::from_str(&blob)?;
        let items: Vec<Item> = records
            .into_iter()
            .map(|record| Item::rehydrate(record.into()))
            .collect();

        tracing::info!(key = %self.key, count = items.len(), "loaded stored list");
        Ok(items)
    }

    /// Serialises the whole list and overwrites the slot in a single write.
    pub async fn save(&self, items: &[Item]) -> Result<(), PersistenceError> {
        let records: Vec<ItemRecord> = items.iter().map(ItemRecord::from).collect();
        let blob = serde_json::to_string(&records)?;

        self.store.set_item(&self.key, &blob).await?;

        tracing::debug!(key = %self.key, count = items.len(), "saved list");
        Ok(())
    }
}
