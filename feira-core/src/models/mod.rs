mod item;

pub use item::{Item, ItemId, ItemPatch, StoredItem};
