//! Infrastructure layer: storage backends and the service surface.
//!
//! The `store` module defines the storage boundary (one trait, an in-memory
//! implementation for tests/dev, and a Postgres implementation for
//! production). The `service` module hosts the two application services —
//! `ItemRegistry` and `MovementLedger` — that orchestrate the pure domain
//! crates against a store.

pub mod service;
pub mod store;

pub use service::{ItemRegistry, MovementLedger};
pub use store::{InMemoryInventoryStore, InventoryStore, PostgresInventoryStore, StoreError};

#[cfg(test)]
mod integration_tests;
