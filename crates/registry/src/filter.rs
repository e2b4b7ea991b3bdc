use serde::{Deserialize, Serialize};

use crate::item::Item;

/// Filter over registered items.
///
/// All criteria are conjunctive. `product_type`, `brand` and `location`
/// match exactly; `serial` is a substring match; `term` is a free-text
/// substring over barcode, name, brand, model and serial number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFilter {
    pub product_type: Option<String>,
    pub brand: Option<String>,
    pub location: Option<String>,
    pub serial: Option<String>,
    pub term: Option<String>,
    pub in_stock_only: bool,
}

impl ItemFilter {
    /// The match-everything filter.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn matches(&self, item: &Item) -> bool {
        if let Some(pt) = non_blank(&self.product_type) {
            if item.product_type() != Some(pt) {
                return false;
            }
        }

        if let Some(brand) = non_blank(&self.brand) {
            if item.brand() != Some(brand) {
                return false;
            }
        }

        if let Some(loc) = non_blank(&self.location) {
            if item.location().as_str() != loc {
                return false;
            }
        }

        if let Some(serial) = non_blank(&self.serial) {
            match item.serial_number() {
                Some(s) if s.contains(serial) => {}
                _ => return false,
            }
        }

        if let Some(term) = non_blank(&self.term) {
            let hit = item.barcode().as_str().contains(term)
                || item.name().contains(term)
                || item.brand().is_some_and(|v| v.contains(term))
                || item.model().is_some_and(|v| v.contains(term))
                || item.serial_number().is_some_and(|v| v.contains(term));
            if !hit {
                return false;
            }
        }

        if self.in_stock_only && !item.in_stock() {
            return false;
        }

        true
    }
}

/// Blank filter values mean "no constraint", mirroring raw query params.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
