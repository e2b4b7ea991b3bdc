use std::sync::Arc;

use thiserror::Error;

use stocktrace_core::{Barcode, ItemId};
use stocktrace_ledger::MovementRecord;
use stocktrace_registry::{Item, ItemFilter};

/// Which unique index rejected a write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UniqueField {
    Barcode,
    SerialNumber,
}

/// Storage operation error.
///
/// Storage-native classification; the service layer maps these onto the
/// domain error taxonomy. `Duplicate` and `Concurrency` are deterministic
/// outcomes of the store's own constraints; `Backend` covers connectivity
/// and everything else possibly transient.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0:?}")]
    Duplicate(UniqueField),

    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("row not found")]
    NotFound,

    #[error("movement history references the item")]
    HistoryRetained,

    #[error("backend failure: {0}")]
    Backend(String),
}

/// Storage for items and the append-only movement ledger.
///
/// ## Contract
///
/// - **Identity**: items are keyed by `ItemId`; `barcode` and (when
///   present) `serial_number` are unique across all items. Writes that
///   would break either index fail with `Duplicate`.
/// - **Versioning**: every item write carries the version the writer read.
///   A stored version that no longer matches fails with `Concurrency` and
///   leaves the store untouched.
/// - **Atomic move**: `commit_move` persists the item's new state and
///   appends the movement record in one transaction — all or nothing. This
///   is the mechanism that serializes concurrent writers per barcode; no
///   in-process lock is assumed to protect a shared backend.
/// - **Ledger immutability**: movement records are append-only; the trait
///   deliberately offers no way to update or delete one.
/// - **Removal**: `remove_item` fails with `HistoryRetained` while any
///   movement record references the item's barcode, checked atomically
///   with the delete.
pub trait InventoryStore: Send + Sync {
    /// Insert a freshly registered item, enforcing both unique indexes.
    fn insert_item(&self, item: Item) -> Result<(), StoreError>;

    fn item_by_id(&self, id: ItemId) -> Result<Option<Item>, StoreError>;

    fn item_by_barcode(&self, barcode: &Barcode) -> Result<Option<Item>, StoreError>;

    /// Persist an updated item. `expected_version` is the version the
    /// writer loaded; the item itself carries the incremented one.
    fn update_item(&self, item: &Item, expected_version: u64) -> Result<(), StoreError>;

    /// Delete an item that has no movement history.
    fn remove_item(&self, id: ItemId) -> Result<(), StoreError>;

    /// Items matching `filter`, most recently registered first, at most
    /// `limit` rows.
    fn list_items(&self, filter: &ItemFilter, limit: usize) -> Result<Vec<Item>, StoreError>;

    /// Persist the moved item and append its movement record atomically.
    fn commit_move(
        &self,
        item: &Item,
        expected_version: u64,
        record: MovementRecord,
    ) -> Result<MovementRecord, StoreError>;

    /// Movement records, optionally filtered to one barcode, most recent
    /// first (`occurred_at` desc, id desc), at most `limit` rows.
    fn movements(
        &self,
        barcode: Option<&str>,
        limit: usize,
    ) -> Result<Vec<MovementRecord>, StoreError>;

    /// Whether any movement record references the barcode.
    fn has_movements(&self, barcode: &str) -> Result<bool, StoreError>;
}

impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    fn insert_item(&self, item: Item) -> Result<(), StoreError> {
        (**self).insert_item(item)
    }

    fn item_by_id(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        (**self).item_by_id(id)
    }

    fn item_by_barcode(&self, barcode: &Barcode) -> Result<Option<Item>, StoreError> {
        (**self).item_by_barcode(barcode)
    }

    fn update_item(&self, item: &Item, expected_version: u64) -> Result<(), StoreError> {
        (**self).update_item(item, expected_version)
    }

    fn remove_item(&self, id: ItemId) -> Result<(), StoreError> {
        (**self).remove_item(id)
    }

    fn list_items(&self, filter: &ItemFilter, limit: usize) -> Result<Vec<Item>, StoreError> {
        (**self).list_items(filter, limit)
    }

    fn commit_move(
        &self,
        item: &Item,
        expected_version: u64,
        record: MovementRecord,
    ) -> Result<MovementRecord, StoreError> {
        (**self).commit_move(item, expected_version, record)
    }

    fn movements(
        &self,
        barcode: Option<&str>,
        limit: usize,
    ) -> Result<Vec<MovementRecord>, StoreError> {
        (**self).movements(barcode, limit)
    }

    fn has_movements(&self, barcode: &str) -> Result<bool, StoreError> {
        (**self).has_movements(barcode)
    }
}
