//! In-memory shopping list with functional updates.
//!
//! The list holds an immutable `Arc<[Item]>` snapshot. Every mutation builds
//! a complete new sequence and swaps it in, so a reader holding a snapshot
//! sees the list either before or after an operation, never halfway.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::models::{Item, ItemId, ItemPatch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingList {
    items: Arc<[Item]>,
}

impl Default for ShoppingList {
    fn default() -> Self {
        Self::new()
    }
}

impl ShoppingList {
    /// An empty list.
    pub fn new() -> Self {
        Self {
            items: Arc::from(Vec::new()),
        }
    }

    /// A list restored from storage, in stored order.
    pub fn from_items(items: Vec<Item>) -> Self {
        Self {
            items: Arc::from(items),
        }
    }

    /// Current snapshot; cheap to clone and never changes underneath.
    pub fn snapshot(&self) -> Arc<[Item]> {
        Arc::clone(&self.items)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Appends a new item built from raw text input and returns its id.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        quantity: &str,
        unit_price: &str,
    ) -> ItemId {
        self.push(Item::create(name, quantity, unit_price))
    }

    /// Appends an already built item and returns its id.
    pub fn push(&mut self, item: Item) -> ItemId {
        let id = item.id().clone();
        self.items = self
            .items
            .iter()
            .cloned()
            .chain(std::iter::once(item))
            .collect();
        id
    }

    /// Removes the first item with `id`. Returns `false` (and leaves the
    /// list untouched) when nothing matches.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        let Some(position) = self.items.iter().position(|item| item.id() == id) else {
            return false;
        };
        self.items = self
            .items
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != position)
            .map(|(_, item)| item.clone())
            .collect();
        true
    }

    /// Replaces the item with `id` by a freshly built one carrying the
    /// patched fields. Position and id are preserved. Returns `false` when
    /// nothing matches.
    pub fn update(
        &mut self,
        id: &ItemId,
        patch: &ItemPatch,
    ) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        self.items = self
            .items
            .iter()
            .map(|item| {
                if item.id() == id {
                    item.patched(patch)
                } else {
                    item.clone()
                }
            })
            .collect();
        true
    }

    /// Sum of every item's total. Recomputed on each call.
    pub fn total(&self) -> Decimal {
        total_of(&self.items)
    }
}

/// Sum of the `total` snapshot of each item; zero for an empty slice.
///
/// Saturates at [`Decimal::MAX`] instead of overflowing.
pub fn total_of(items: &[Item]) -> Decimal {
    items
        .iter()
        .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.total()))
        .unwrap_or_else(|| {
            tracing::warn!(items = items.len(), "list total overflowed, saturating");
            Decimal::MAX
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::parse::MAX_AMOUNT;

    fn two_item_list() -> (ShoppingList, ItemId, ItemId) {
        let mut list = ShoppingList::new();
        let rice = list.add("Rice", "2", "5,50");
        let soap = list.add("Soap", "1", "3.25");
        (list, rice, soap)
    }

    #[test]
    fn add_appends_in_insertion_order() {
        let (list, rice, soap) = two_item_list();

        assert_eq!(list.len(), 2);
        assert_eq!(list.items()[0].id(), &rice);
        assert_eq!(list.items()[1].id(), &soap);
    }

    #[test]
    fn add_then_remove_restores_previous_list() {
        let (mut list, _, _) = two_item_list();
        let before = list.clone();

        let id = list.add("Eggs", "12", "0.80");
        assert!(list.remove(&id));

        assert_eq!(list, before);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let (mut list, _, _) = two_item_list();
        let before = list.clone();

        assert!(!list.remove(&ItemId::from("missing")));
        assert_eq!(list, before);
    }

    #[test]
    fn update_replaces_item_in_place() {
        let (mut list, rice, soap) = two_item_list();

        assert!(list.update(&rice, &ItemPatch::new().quantity(dec!(3))));

        let updated = &list.items()[0];
        assert_eq!(updated.id(), &rice);
        assert_eq!(updated.name(), "Rice");
        assert_eq!(updated.unit_price(), dec!(5.5));
        assert_eq!(updated.total(), dec!(16.50));
        assert_eq!(list.items()[1].id(), &soap);
    }

    #[test]
    fn update_leaves_other_items_untouched() {
        let (mut list, rice, _) = two_item_list();
        let soap_before = list.items()[1].clone();

        list.update(&rice, &ItemPatch::new().name("Brown rice").unit_price(dec!(6)));

        assert_eq!(list.items()[1], soap_before);
        assert_eq!(list.items()[0].name(), "Brown rice");
        assert_eq!(list.items()[0].total(), dec!(12.00));
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let (mut list, _, _) = two_item_list();
        let before = list.clone();

        assert!(!list.update(&ItemId::from("missing"), &ItemPatch::new().quantity(dec!(9))));
        assert_eq!(list, before);
    }

    #[test]
    fn total_of_empty_is_zero() {
        assert_eq!(total_of(&[]), Decimal::ZERO);
        assert_eq!(ShoppingList::new().total(), Decimal::ZERO);
    }

    #[test]
    fn total_sums_item_totals() {
        let (list, _, _) = two_item_list();

        assert_eq!(list.total(), dec!(14.25));
        assert_eq!(
            list.total(),
            list.items().iter().map(|item| item.total()).sum::<Decimal>()
        );
    }

    #[test]
    fn snapshot_is_not_affected_by_later_mutations() {
        let (mut list, rice, _) = two_item_list();
        let snapshot = list.snapshot();

        list.remove(&rice);
        list.add("Beans", "1", "7");

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id(), &rice);
        assert_eq!(total_of(&snapshot), dec!(14.25));
    }

    #[test]
    fn total_of_large_items_is_exact() {
        let bulk = Item::create("Bulk", "1000000000000", "1000000000000");

        assert_eq!(total_of(&[bulk.clone(), bulk]), MAX_AMOUNT * MAX_AMOUNT * Decimal::TWO);
    }

    #[test]
    fn total_of_saturates_instead_of_overflowing() {
        let bulk = Item::create("Bulk", "1000000000000", "1000000000000");
        let items = vec![bulk; 80_000];

        assert_eq!(total_of(&items), Decimal::MAX);
    }
}
