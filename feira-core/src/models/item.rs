use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::round_half_up;
use crate::parse::{clamp_amount, coerce_decimal};

/// Opaque item identifier. Fresh ids are random UUID v4 text; ids read back
/// from storage are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One shopping-list entry.
///
/// Items are immutable values. `total` is a snapshot of
/// `round(quantity * unit_price, 2)` taken when the item was built; an edit
/// produces a new item instead of touching this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    name: String,
    quantity: Decimal,
    unit_price: Decimal,
    total: Decimal,
}

/// Raw fields as they sit in the persisted JSON blob, already coerced to
/// numbers. Derived fields are not part of it: they are always recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredItem {
    pub id: String,
    pub name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl Item {
    /// Builds a new item from raw text input, minting a fresh id.
    ///
    /// Quantities and prices go through [`coerce_decimal`], so `"5,50"`
    /// reads as `5.5` and `"abc"` as `0`.
    pub fn create(
        name: impl Into<String>,
        quantity: &str,
        unit_price: &str,
    ) -> Self {
        Self::new(name, coerce_decimal(quantity), coerce_decimal(unit_price))
    }

    /// Builds a new item from typed amounts, minting a fresh id.
    /// Negative amounts and amounts above [`MAX_AMOUNT`](crate::parse::MAX_AMOUNT) become zero.
    pub fn new(
        name: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self::with_id(ItemId::generate(), name, quantity, unit_price)
    }

    /// Rebuilds an item read back from storage.
    ///
    /// The persisted id is kept; only an empty id gets a freshly minted
    /// one. `total` is recomputed from quantity and unit price.
    pub fn rehydrate(stored: StoredItem) -> Self {
        let id = if stored.id.trim().is_empty() {
            let id = ItemId::generate();
            tracing::warn!(%id, name = %stored.name, "stored item had no id, minted a new one");
            id
        } else {
            ItemId(stored.id)
        };
        Self::with_id(id, stored.name, stored.quantity, stored.unit_price)
    }

    fn with_id(
        id: ItemId,
        name: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        let quantity = clamp_amount(quantity);
        let unit_price = clamp_amount(unit_price);
        let total = match quantity.checked_mul(unit_price) {
            Some(product) => round_half_up(product),
            None => {
                tracing::warn!(%quantity, %unit_price, "item total overflowed, using zero");
                Decimal::ZERO
            }
        };
        Self {
            id,
            name: name.into(),
            quantity,
            unit_price,
            total,
        }
    }

    /// Builds the replacement for this item with `patch` applied.
    ///
    /// The replacement keeps this item's id. An absent or empty name keeps
    /// the current name.
    pub fn patched(&self, patch: &ItemPatch) -> Self {
        let name = patch
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.name);
        Self::with_id(
            self.id.clone(),
            name,
            patch.quantity.unwrap_or(self.quantity),
            patch.unit_price.unwrap_or(self.unit_price),
        )
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Price for one unit of quantity; mirrors `unit_price`.
    pub fn price_per_quantity(&self) -> Decimal {
        self.unit_price
    }

    pub fn total(&self) -> Decimal {
        self.total
    }
}

/// Partial edit of an item. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
}

impl ItemPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn unit_price(mut self, unit_price: Decimal) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    /// Raw text variants, coerced like [`Item::create`].
    pub fn quantity_text(self, quantity: &str) -> Self {
        self.quantity(coerce_decimal(quantity))
    }

    pub fn unit_price_text(self, unit_price: &str) -> Self {
        self.unit_price(coerce_decimal(unit_price))
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none() && self.unit_price.is_none()
    }
}
