//! Application services: the operation surface callers consume.
//!
//! Two services, one per component: `ItemRegistry` owns item identity and
//! descriptive state, `MovementLedger` owns the move transition and its
//! history. Both are generic over the store so tests run against the
//! in-memory backend and production against Postgres.

pub mod ledger;
pub mod registry;

pub use ledger::{MovementLedger, FILTERED_HISTORY_LIMIT, HISTORY_LIMIT};
pub use registry::{ItemRegistry, LIST_LIMIT};

use stocktrace_core::{DomainError, ValidationCode};

use crate::store::{StoreError, UniqueField};

/// Map storage-native failures onto the domain error taxonomy.
pub(crate) fn map_store_error(err: StoreError) -> DomainError {
    match err {
        StoreError::Duplicate(UniqueField::Barcode) => {
            DomainError::validation("barcode", ValidationCode::BarcodeDuplicate)
        }
        StoreError::Duplicate(UniqueField::SerialNumber) => {
            DomainError::validation("serial_number", ValidationCode::SerialDuplicate)
        }
        StoreError::Concurrency(msg) => DomainError::conflict(msg),
        StoreError::NotFound => DomainError::not_found(),
        StoreError::HistoryRetained => {
            DomainError::conflict("movement history references the item")
        }
        StoreError::Backend(msg) => DomainError::storage(msg),
    }
}
