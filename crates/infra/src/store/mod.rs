//! Item + movement storage boundary.
//!
//! One trait covers both components' persistence needs so a single
//! transaction can span the item state change and the ledger append. No
//! storage assumptions leak upward: uniqueness, version checks and the
//! atomic move commit are each implementation's obligation.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryInventoryStore;
pub use postgres::PostgresInventoryStore;
pub use r#trait::{InventoryStore, StoreError, UniqueField};
