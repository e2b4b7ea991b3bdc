use std::collections::HashMap;
use std::sync::RwLock;

use stocktrace_core::{Barcode, ItemId};
use stocktrace_ledger::{sort_most_recent_first, MovementRecord};
use stocktrace_registry::{Item, ItemFilter};

use super::r#trait::{InventoryStore, StoreError, UniqueField};

#[derive(Debug, Default)]
struct State {
    items: HashMap<ItemId, Item>,
    by_barcode: HashMap<String, ItemId>,
    by_serial: HashMap<String, ItemId>,
    movements: Vec<MovementRecord>,
}

/// In-memory item + ledger store.
///
/// Intended for tests/dev. All writes go through one `RwLock`, which is
/// what makes `commit_move` atomic here; the Postgres implementation gets
/// the same guarantee from a database transaction.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    state: RwLock<State>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

impl InventoryStore for InMemoryInventoryStore {
    fn insert_item(&self, item: Item) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;

        let barcode = item.barcode().as_str().to_owned();
        if state.by_barcode.contains_key(&barcode) {
            return Err(StoreError::Duplicate(UniqueField::Barcode));
        }
        if let Some(serial) = item.serial_number() {
            if state.by_serial.contains_key(serial) {
                return Err(StoreError::Duplicate(UniqueField::SerialNumber));
            }
        }

        let id = item.id_typed();
        if let Some(serial) = item.serial_number() {
            state.by_serial.insert(serial.to_owned(), id);
        }
        state.by_barcode.insert(barcode, id);
        state.items.insert(id, item);
        Ok(())
    }

    fn item_by_id(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.items.get(&id).cloned())
    }

    fn item_by_barcode(&self, barcode: &Barcode) -> Result<Option<Item>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state
            .by_barcode
            .get(barcode.as_str())
            .and_then(|id| state.items.get(id))
            .cloned())
    }

    fn update_item(&self, item: &Item, expected_version: u64) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let id = item.id_typed();

        let stored = state.items.get(&id).ok_or(StoreError::NotFound)?;
        if stored.version() != expected_version {
            return Err(StoreError::Concurrency(format!(
                "expected version {expected_version}, found {}",
                stored.version()
            )));
        }

        // Serial re-check excluding the item itself; barcode is immutable
        // after registration so its index entry stays put.
        if let Some(serial) = item.serial_number() {
            if let Some(other) = state.by_serial.get(serial) {
                if *other != id {
                    return Err(StoreError::Duplicate(UniqueField::SerialNumber));
                }
            }
        }

        if let Some(old_serial) = stored.serial_number().map(str::to_owned) {
            state.by_serial.remove(&old_serial);
        }
        if let Some(serial) = item.serial_number() {
            state.by_serial.insert(serial.to_owned(), id);
        }
        state.items.insert(id, item.clone());
        Ok(())
    }

    fn remove_item(&self, id: ItemId) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;

        let stored = state.items.get(&id).ok_or(StoreError::NotFound)?;
        let barcode = stored.barcode().as_str().to_owned();

        if state.movements.iter().any(|m| m.barcode.as_str() == barcode) {
            return Err(StoreError::HistoryRetained);
        }

        if let Some(serial) = state
            .items
            .get(&id)
            .and_then(|i| i.serial_number().map(str::to_owned))
        {
            state.by_serial.remove(&serial);
        }
        state.by_barcode.remove(&barcode);
        state.items.remove(&id);
        Ok(())
    }

    fn list_items(&self, filter: &ItemFilter, limit: usize) -> Result<Vec<Item>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;

        let mut matched: Vec<Item> = state
            .items
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();

        // Most recently registered first; UUIDv7 ids sort by creation time.
        matched.sort_by(|a, b| b.id_typed().as_uuid().cmp(a.id_typed().as_uuid()));
        matched.truncate(limit);
        Ok(matched)
    }

    fn commit_move(
        &self,
        item: &Item,
        expected_version: u64,
        record: MovementRecord,
    ) -> Result<MovementRecord, StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let id = item.id_typed();

        let stored = state.items.get(&id).ok_or(StoreError::NotFound)?;
        if stored.version() != expected_version {
            return Err(StoreError::Concurrency(format!(
                "expected version {expected_version}, found {}",
                stored.version()
            )));
        }

        // Single write-lock scope: state change + append happen together.
        state.items.insert(id, item.clone());
        state.movements.push(record.clone());
        Ok(record)
    }

    fn movements(
        &self,
        barcode: Option<&str>,
        limit: usize,
    ) -> Result<Vec<MovementRecord>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;

        let mut records: Vec<MovementRecord> = match barcode {
            Some(code) => state
                .movements
                .iter()
                .filter(|m| m.barcode.as_str() == code)
                .cloned()
                .collect(),
            None => state.movements.clone(),
        };

        sort_most_recent_first(&mut records);
        records.truncate(limit);
        Ok(records)
    }

    fn has_movements(&self, barcode: &str) -> Result<bool, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.movements.iter().any(|m| m.barcode.as_str() == barcode))
    }
}
