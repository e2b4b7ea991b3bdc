use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocktrace_core::{
    Barcode, DomainError, DomainResult, Entity, ItemId, Location, ValidationCode,
};

/// Fields supplied when registering a new item.
///
/// `barcode` is the raw caller string; it is normalized (trimmed) and
/// length-checked during registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub barcode: String,
    pub name: String,
    pub product_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub description: Option<String>,
    pub serial_number: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewItem {
    /// Minimal constructor; descriptive extras default to `None`.
    pub fn new(barcode: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
            name: name.into(),
            product_type: None,
            brand: None,
            model: None,
            description: None,
            serial_number: None,
            created_at: None,
        }
    }
}

/// Replacement set of descriptive fields.
///
/// `location` and `current_holder` are deliberately absent: state
/// attributes change only through the movement ledger, and that rule is
/// enforced by this type's shape rather than a runtime check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptiveUpdate {
    pub name: String,
    pub product_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub description: Option<String>,
    pub serial_number: Option<String>,
}

/// A single physical, barcode-identified unit of inventory.
///
/// Identity is the `ItemId`; the barcode is the unique external key.
/// `version` counts mutations and is the optimistic-concurrency token the
/// storage layer checks on every write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    barcode: Barcode,
    name: String,
    product_type: Option<String>,
    brand: Option<String>,
    model: Option<String>,
    description: Option<String>,
    serial_number: Option<String>,
    created_at: Option<DateTime<Utc>>,
    location: Location,
    current_holder: Option<String>,
    version: u64,
}

/// Blank-insensitive normalization for optional text fields.
fn normalize_opt(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    })
}

impl Item {
    /// Register a new item.
    ///
    /// Validates barcode shape and the required name; a fresh item always
    /// starts in storage with no holder. Barcode/serial uniqueness across
    /// items needs the store's indexes and is checked there, not here.
    pub fn register(new: NewItem) -> DomainResult<Self> {
        let barcode = Barcode::parse(&new.barcode)?;

        let name = new.name.trim().to_owned();
        if name.is_empty() {
            return Err(DomainError::validation("name", ValidationCode::MissingField));
        }

        Ok(Self {
            id: ItemId::new(),
            barcode,
            name,
            product_type: normalize_opt(new.product_type),
            brand: normalize_opt(new.brand),
            model: normalize_opt(new.model),
            description: normalize_opt(new.description),
            serial_number: normalize_opt(new.serial_number),
            created_at: new.created_at,
            location: Location::storage(),
            current_holder: None,
            version: 1,
        })
    }

    /// Rebuild an item from stored state. Infra-only constructor; callers
    /// go through `register`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: ItemId,
        barcode: Barcode,
        name: String,
        product_type: Option<String>,
        brand: Option<String>,
        model: Option<String>,
        description: Option<String>,
        serial_number: Option<String>,
        created_at: Option<DateTime<Utc>>,
        location: Location,
        current_holder: Option<String>,
        version: u64,
    ) -> Self {
        Self {
            id,
            barcode,
            name,
            product_type,
            brand,
            model,
            description,
            serial_number,
            created_at,
            location,
            current_holder,
            version,
        }
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn barcode(&self) -> &Barcode {
        &self.barcode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn product_type(&self) -> Option<&str> {
        self.product_type.as_deref()
    }

    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn serial_number(&self) -> Option<&str> {
        self.serial_number.as_deref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn current_holder(&self) -> Option<&str> {
        self.current_holder.as_deref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Derived in-stock flag: the item is in stock iff its location is the
    /// storage label. Never stored, never settable.
    pub fn in_stock(&self) -> bool {
        self.location.is_storage()
    }

    /// Replace the descriptive fields.
    ///
    /// State attributes (location/holder) are untouched. Serial/barcode
    /// uniqueness against *other* items is the store's re-check on write.
    pub fn apply_descriptive(&mut self, update: DescriptiveUpdate) -> DomainResult<()> {
        let name = update.name.trim().to_owned();
        if name.is_empty() {
            return Err(DomainError::validation("name", ValidationCode::MissingField));
        }

        self.name = name;
        self.product_type = normalize_opt(update.product_type);
        self.brand = normalize_opt(update.brand);
        self.model = normalize_opt(update.model);
        self.description = normalize_opt(update.description);
        self.serial_number = normalize_opt(update.serial_number);
        self.version += 1;
        Ok(())
    }

    /// Apply a move transition to the item's state.
    ///
    /// The holder is cleared on every move, entries and exits alike; holder
    /// attribution lives in the movement record's `performed_by`, not here.
    pub fn apply_move(&mut self, target: Location) {
        self.location = target;
        self.current_holder = None;
        self.version += 1;
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
