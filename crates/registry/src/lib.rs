//! `stocktrace-registry` — the Item Registry domain.
//!
//! Owns canonical item records: registration rules, descriptive updates,
//! the move-driven state change, and the list/search contract. Pure domain
//! logic; persistence and uniqueness enforcement live in the infra layer.

pub mod filter;
pub mod item;
pub mod summary;

pub use filter::ItemFilter;
pub use item::{DescriptiveUpdate, Item, NewItem};
pub use summary::ItemSummary;
