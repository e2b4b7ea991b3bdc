use chrono::{DateTime, Utc};
use serde::Deserialize;

use stocktrace_ledger::MoveRequest;
use stocktrace_registry::{DescriptiveUpdate, Item, ItemFilter, NewItem};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterItemRequest {
    pub barcode: String,
    pub name: String,
    pub product_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub description: Option<String>,
    pub serial_number: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<RegisterItemRequest> for NewItem {
    fn from(req: RegisterItemRequest) -> Self {
        let mut new = NewItem::new(req.barcode, req.name);
        new.product_type = req.product_type;
        new.brand = req.brand;
        new.model = req.model;
        new.description = req.description;
        new.serial_number = req.serial_number;
        new.created_at = req.created_at;
        new
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: String,
    pub product_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub description: Option<String>,
    pub serial_number: Option<String>,
}

impl From<UpdateItemRequest> for DescriptiveUpdate {
    fn from(req: UpdateItemRequest) -> Self {
        DescriptiveUpdate {
            name: req.name,
            product_type: req.product_type,
            brand: req.brand,
            model: req.model,
            description: req.description,
            serial_number: req.serial_number,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MoveItemRequest {
    pub target_location: String,
    pub performed_by: Option<String>,
    pub note: Option<String>,
}

impl MoveItemRequest {
    pub fn into_move(self, barcode: String) -> MoveRequest {
        let mut req = MoveRequest::new(barcode, self.target_location);
        req.performed_by = self.performed_by;
        req.note = self.note;
        req
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListItemsQuery {
    pub term: Option<String>,
    pub product_type: Option<String>,
    pub brand: Option<String>,
    pub location: Option<String>,
    pub serial: Option<String>,
    #[serde(default)]
    pub in_stock_only: bool,
}

impl From<ListItemsQuery> for ItemFilter {
    fn from(q: ListItemsQuery) -> Self {
        ItemFilter {
            product_type: q.product_type,
            brand: q.brand,
            location: q.location,
            serial: q.serial,
            term: q.term,
            in_stock_only: q.in_stock_only,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub barcode: Option<String>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

/// Full item payload (the summary shape plus identity/audit fields).
pub fn item_to_json(item: &Item) -> serde_json::Value {
    serde_json::json!({
        "id": item.id_typed().to_string(),
        "barcode": item.barcode().as_str(),
        "name": item.name(),
        "product_type": item.product_type(),
        "brand": item.brand(),
        "model": item.model(),
        "description": item.description(),
        "serial_number": item.serial_number(),
        "created_at": item.created_at().map(|t| t.to_rfc3339()),
        "location": item.location().as_str(),
        "current_holder": item.current_holder(),
        "in_stock": item.in_stock(),
    })
}
