mod item_form;

pub use item_form::{ItemEditForm, ItemForm};
