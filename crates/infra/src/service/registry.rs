use tracing::instrument;

use stocktrace_core::{Barcode, DomainResult, ItemId};
use stocktrace_registry::{DescriptiveUpdate, Item, ItemFilter, ItemSummary, NewItem};

use crate::store::InventoryStore;

use super::map_store_error;

/// Cap on list/search results.
pub const LIST_LIMIT: usize = 500;

/// The Item Registry service: create, look up, update and enumerate items.
///
/// Identity invariants (barcode and serial uniqueness) are enforced by the
/// store's unique indexes; this service validates input shape, applies the
/// pure domain rules and translates store failures into the domain error
/// taxonomy.
#[derive(Debug)]
pub struct ItemRegistry<S> {
    store: S,
}

impl<S> ItemRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: InventoryStore> ItemRegistry<S> {
    /// Register a new item. A duplicate barcode or serial number is a
    /// validation failure with the matching reason code.
    #[instrument(skip(self, new), fields(barcode = %new.barcode.trim()))]
    pub fn register(&self, new: NewItem) -> DomainResult<Item> {
        let item = Item::register(new)?;
        self.store
            .insert_item(item.clone())
            .map_err(map_store_error)?;

        tracing::info!(barcode = %item.barcode(), "item registered");
        Ok(item)
    }

    /// Look up an item by raw barcode string. Absence is `None`, not an
    /// error; a malformed barcode is a validation failure.
    #[instrument(skip(self))]
    pub fn find_by_barcode(&self, raw: &str) -> DomainResult<Option<Item>> {
        let barcode = Barcode::parse(raw)?;
        self.store
            .item_by_barcode(&barcode)
            .map_err(map_store_error)
    }

    pub fn find_by_id(&self, id: ItemId) -> DomainResult<Option<Item>> {
        self.store.item_by_id(id).map_err(map_store_error)
    }

    /// Replace an item's descriptive fields.
    ///
    /// Serial uniqueness is re-checked excluding the item itself. Location
    /// and holder cannot be expressed through `DescriptiveUpdate`, so state
    /// attributes stay with the movement ledger.
    #[instrument(skip(self, update), fields(id = %id))]
    pub fn update_descriptive(&self, id: ItemId, update: DescriptiveUpdate) -> DomainResult<Item> {
        let mut item = self
            .store
            .item_by_id(id)
            .map_err(map_store_error)?
            .ok_or_else(stocktrace_core::DomainError::not_found)?;

        let expected = item.version();
        item.apply_descriptive(update)?;
        self.store
            .update_item(&item, expected)
            .map_err(map_store_error)?;

        Ok(item)
    }

    /// Remove an item. Rejected while any movement record references its
    /// barcode; the ledger is never truncated to make a removal possible.
    #[instrument(skip(self), fields(id = %id))]
    pub fn remove(&self, id: ItemId) -> DomainResult<()> {
        self.store.remove_item(id).map_err(map_store_error)?;
        tracing::info!(id = %id, "item removed");
        Ok(())
    }

    /// List matching items as summaries, newest registration first, capped
    /// at [`LIST_LIMIT`] rows.
    #[instrument(skip(self, filter))]
    pub fn list(&self, filter: &ItemFilter) -> DomainResult<Vec<ItemSummary>> {
        let items = self
            .store
            .list_items(filter, LIST_LIMIT)
            .map_err(map_store_error)?;

        Ok(items.iter().map(ItemSummary::from).collect())
    }
}
