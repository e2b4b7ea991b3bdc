use serde::{Deserialize, Serialize};

use crate::item::Item;

/// Lightweight item row for list/search results and barcode lookups.
///
/// This shape is a stable external contract, distinct from the full `Item`:
/// callers render it directly and the field set does not change with
/// internal model evolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub barcode: String,
    pub name: String,
    pub product_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub location: String,
    pub current_holder: Option<String>,
    pub in_stock: bool,
}

impl From<&Item> for ItemSummary {
    fn from(item: &Item) -> Self {
        Self {
            barcode: item.barcode().as_str().to_owned(),
            name: item.name().to_owned(),
            product_type: item.product_type().map(str::to_owned),
            brand: item.brand().map(str::to_owned),
            model: item.model().map(str::to_owned),
            serial_number: item.serial_number().map(str::to_owned),
            location: item.location().as_str().to_owned(),
            current_holder: item.current_holder().map(str::to_owned),
            in_stock: item.in_stock(),
        }
    }
}
