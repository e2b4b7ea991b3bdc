use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocktrace_core::{Barcode, Entity, Location, MovementId};
use stocktrace_registry::Item;

/// Direction of a movement relative to storage.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Entry,
    Exit,
}

impl MovementKind {
    /// Classify a move by its target: storage is an `Entry`, any other
    /// location is an `Exit`.
    pub fn classify(target: &Location) -> Self {
        if target.is_storage() {
            MovementKind::Entry
        } else {
            MovementKind::Exit
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MovementKind::Entry => "entry",
            MovementKind::Exit => "exit",
        }
    }
}

/// One immutable ledger entry.
///
/// Appended as the side effect of a successful move and never updated or
/// deleted afterwards (audit-log semantics). Items are tracked as discrete
/// single units, so `quantity` is always [`MovementRecord::UNIT_QUANTITY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub id: MovementId,
    pub barcode: Barcode,
    pub kind: MovementKind,
    pub quantity: u32,
    pub target_location: Location,
    pub performed_by: Option<String>,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl MovementRecord {
    pub const UNIT_QUANTITY: u32 = 1;

    /// Build the record describing `item` moving to `target`.
    ///
    /// `occurred_at` is assigned by the caller at append time, so the
    /// timestamp matches the commit, not request construction.
    pub fn for_move(
        item: &Item,
        target: Location,
        performed_by: Option<String>,
        note: Option<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MovementId::new(),
            barcode: item.barcode().clone(),
            kind: MovementKind::classify(&target),
            quantity: Self::UNIT_QUANTITY,
            target_location: target,
            performed_by,
            note,
            occurred_at,
        }
    }
}

impl Entity for MovementRecord {
    type Id = MovementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stocktrace_registry::NewItem;

    #[test]
    fn storage_classifies_as_entry_everything_else_as_exit() {
        assert_eq!(
            MovementKind::classify(&Location::storage()),
            MovementKind::Entry
        );
        for label in ["Office", "Out-of-stock", "storage", "Depot"] {
            assert_eq!(
                MovementKind::classify(&Location::parse(label).unwrap()),
                MovementKind::Exit,
                "{label:?} should classify as exit"
            );
        }
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: classification is binary — only the exact storage
            /// label is an entry.
            #[test]
            fn only_storage_classifies_as_entry(label in "[A-Za-z][A-Za-z -]{0,19}") {
                let target = Location::parse(&label).unwrap();
                let expected = if target.as_str() == Location::STORAGE {
                    MovementKind::Entry
                } else {
                    MovementKind::Exit
                };
                prop_assert_eq!(MovementKind::classify(&target), expected);
            }
        }
    }

    #[test]
    fn record_carries_unit_quantity_and_item_barcode() {
        let item = Item::register(NewItem::new("AB1234", "Widget")).unwrap();
        let record = MovementRecord::for_move(
            &item,
            Location::parse("Office").unwrap(),
            Some("Alice".to_string()),
            None,
            Utc::now(),
        );

        assert_eq!(record.barcode, *item.barcode());
        assert_eq!(record.kind, MovementKind::Exit);
        assert_eq!(record.quantity, MovementRecord::UNIT_QUANTITY);
        assert_eq!(record.target_location.as_str(), "Office");
        assert_eq!(record.performed_by.as_deref(), Some("Alice"));
    }
}
