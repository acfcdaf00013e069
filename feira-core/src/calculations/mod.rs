//! Money arithmetic for shopping-list items and reports.

pub mod common;

pub use common::{format_two_places, format_two_places_comma, round_half_up};
