use chrono::Utc;
use tracing::instrument;

use stocktrace_core::DomainResult;
use stocktrace_ledger::{AcceptedLocations, MoveRequest, MovementRecord};

use crate::store::InventoryStore;

use super::map_store_error;

/// Cap on unfiltered history queries.
pub const HISTORY_LIMIT: usize = 500;

/// Cap on single-barcode history queries.
pub const FILTERED_HISTORY_LIMIT: usize = 200;

/// The Movement Ledger service: the move state machine plus its history.
///
/// A move loads the item, validates the transition, mutates item state
/// through the registry's own rules (`Item::apply_move`) and appends the
/// record — with the state change and the append committed atomically by
/// the store. A concurrent writer on the same barcode loses the version
/// check and surfaces a conflict for the caller to retry from scratch.
#[derive(Debug)]
pub struct MovementLedger<S> {
    store: S,
    accepted: AcceptedLocations,
}

impl<S> MovementLedger<S> {
    /// Ledger accepting the standard label set.
    pub fn new(store: S) -> Self {
        Self {
            store,
            accepted: AcceptedLocations::standard(),
        }
    }

    /// Ledger with a deployment-specific label set.
    pub fn with_locations(store: S, accepted: AcceptedLocations) -> Self {
        Self { store, accepted }
    }

    pub fn accepted_locations(&self) -> &AcceptedLocations {
        &self.accepted
    }
}

impl<S: InventoryStore> MovementLedger<S> {
    /// Execute a move: classify, mutate item state, append the record.
    ///
    /// Not idempotent at the ledger level — every successful call appends
    /// one record, even when the target equals the current location.
    #[instrument(
        skip(self, request),
        fields(barcode = %request.barcode.trim(), target = %request.target_location)
    )]
    pub fn move_item(&self, request: MoveRequest) -> DomainResult<MovementRecord> {
        let validated = request.validate(&self.accepted)?;

        let mut item = self
            .store
            .item_by_barcode(&validated.barcode)
            .map_err(map_store_error)?
            .ok_or_else(stocktrace_core::DomainError::not_found)?;

        let expected = item.version();
        let record = MovementRecord::for_move(
            &item,
            validated.target.clone(),
            validated.performed_by,
            validated.note,
            Utc::now(),
        );
        item.apply_move(validated.target);

        let record = self
            .store
            .commit_move(&item, expected, record)
            .map_err(map_store_error)?;

        tracing::info!(
            barcode = %record.barcode,
            kind = record.kind.as_str(),
            target = %record.target_location,
            "movement recorded"
        );
        Ok(record)
    }

    /// Movement history, most recent first.
    ///
    /// With a barcode the result is that item's trail (capped at
    /// [`FILTERED_HISTORY_LIMIT`]); without one, the global ledger tail
    /// (capped at [`HISTORY_LIMIT`]). A blank filter means no filter, and
    /// an unknown barcode yields an empty list rather than an error.
    #[instrument(skip(self))]
    pub fn history(&self, barcode: Option<&str>) -> DomainResult<Vec<MovementRecord>> {
        let trimmed = barcode.map(str::trim).filter(|s| !s.is_empty());
        let limit = if trimmed.is_some() {
            FILTERED_HISTORY_LIMIT
        } else {
            HISTORY_LIMIT
        };

        self.store
            .movements(trimmed, limit)
            .map_err(map_store_error)
    }
}
