//! End-to-end coverage of the registry + ledger surface against the
//! in-memory store.

use std::sync::Arc;
use std::thread;

use stocktrace_core::{DomainError, Location, ValidationCode};
use stocktrace_ledger::{MoveRequest, MovementKind, MovementRecord};
use stocktrace_registry::{DescriptiveUpdate, ItemFilter, NewItem};

use crate::service::{ItemRegistry, MovementLedger};
use crate::store::InMemoryInventoryStore;

fn setup() -> (
    Arc<InMemoryInventoryStore>,
    ItemRegistry<Arc<InMemoryInventoryStore>>,
    MovementLedger<Arc<InMemoryInventoryStore>>,
) {
    let store = Arc::new(InMemoryInventoryStore::new());
    let registry = ItemRegistry::new(Arc::clone(&store));
    let ledger = MovementLedger::new(Arc::clone(&store));
    (store, registry, ledger)
}

#[test]
fn register_succeeds_once_per_barcode() {
    let (_, registry, _) = setup();

    registry.register(NewItem::new("AB1234", "Widget")).unwrap();
    let err = registry
        .register(NewItem::new("AB1234", "Widget clone"))
        .unwrap_err();
    assert_eq!(
        err.validation_code(),
        Some(ValidationCode::BarcodeDuplicate)
    );
}

#[test]
fn bad_barcode_length_fails_register_and_move() {
    let (_, registry, ledger) = setup();

    for raw in ["AB123", "AB123456"] {
        let err = registry.register(NewItem::new(raw, "Widget")).unwrap_err();
        assert_eq!(err.validation_code(), Some(ValidationCode::BarcodeLength));

        let err = ledger
            .move_item(MoveRequest::new(raw, "Storage"))
            .unwrap_err();
        assert_eq!(err.validation_code(), Some(ValidationCode::BarcodeLength));
    }
}

#[test]
fn register_then_lookup_round_trips() {
    let (_, registry, _) = setup();

    registry.register(NewItem::new("ABC123", "Widget")).unwrap();
    let found = registry.find_by_barcode("ABC123").unwrap().unwrap();
    assert_eq!(found.name(), "Widget");
    assert_eq!(found.location().as_str(), Location::STORAGE);
    assert!(found.in_stock());

    // Lookup normalizes the raw string the same way registration did.
    assert!(registry.find_by_barcode(" ABC123 ").unwrap().is_some());
    assert!(registry.find_by_barcode("XYZ789").unwrap().is_none());
}

#[test]
fn move_to_office_is_an_exit_with_state_applied() {
    let (_, registry, ledger) = setup();
    registry.register(NewItem::new("AB1234", "Widget")).unwrap();

    let mut request = MoveRequest::new("AB1234", "Office");
    request.performed_by = Some("Alice".to_string());
    let record = ledger.move_item(request).unwrap();

    assert_eq!(record.kind, MovementKind::Exit);
    assert_eq!(record.target_location.as_str(), "Office");
    assert_eq!(record.quantity, MovementRecord::UNIT_QUANTITY);
    assert_eq!(record.performed_by.as_deref(), Some("Alice"));

    let item = registry.find_by_barcode("AB1234").unwrap().unwrap();
    assert_eq!(item.location().as_str(), "Office");
    assert_eq!(item.current_holder(), None);
    assert!(!item.in_stock());
}

#[test]
fn move_back_to_storage_is_an_entry() {
    let (_, registry, ledger) = setup();
    registry.register(NewItem::new("AB1234", "Widget")).unwrap();

    ledger.move_item(MoveRequest::new("AB1234", "Office")).unwrap();
    let record = ledger
        .move_item(MoveRequest::new("AB1234", "Storage"))
        .unwrap();

    assert_eq!(record.kind, MovementKind::Entry);
    let item = registry.find_by_barcode("AB1234").unwrap().unwrap();
    assert!(item.in_stock());
    assert_eq!(item.current_holder(), None);
}

#[test]
fn each_successful_move_appends_exactly_one_record() {
    let (_, registry, ledger) = setup();
    registry.register(NewItem::new("AB1234", "Widget")).unwrap();

    for target in ["Office", "Storage", "Out-of-stock"] {
        ledger.move_item(MoveRequest::new("AB1234", target)).unwrap();
    }

    let history = ledger.history(Some("AB1234")).unwrap();
    assert_eq!(history.len(), 3);
    // Most recent first.
    assert_eq!(history[0].target_location.as_str(), "Out-of-stock");
    assert_eq!(history[2].target_location.as_str(), "Office");
}

#[test]
fn moving_unknown_barcode_is_not_found() {
    let (_, _, ledger) = setup();
    let err = ledger
        .move_item(MoveRequest::new("ZZZZZZ", "Storage"))
        .unwrap_err();
    assert_eq!(err, DomainError::NotFound);
}

#[test]
fn moving_to_unknown_location_is_rejected() {
    let (_, registry, ledger) = setup();
    registry.register(NewItem::new("AB1234", "Widget")).unwrap();

    let err = ledger
        .move_item(MoveRequest::new("AB1234", "Warehouse 9"))
        .unwrap_err();
    assert_eq!(
        err.validation_code(),
        Some(ValidationCode::UnknownLocation)
    );
    // The rejected move left no trace.
    assert!(ledger.history(Some("AB1234")).unwrap().is_empty());
}

#[test]
fn duplicate_serial_number_is_rejected() {
    let (_, registry, _) = setup();

    let mut first = NewItem::new("AB1234", "Widget");
    first.serial_number = Some("SN1".to_string());
    registry.register(first).unwrap();

    let mut second = NewItem::new("CD5678", "Widget");
    second.serial_number = Some("SN1".to_string());
    let err = registry.register(second).unwrap_err();
    assert_eq!(err.validation_code(), Some(ValidationCode::SerialDuplicate));
}

#[test]
fn descriptive_update_respects_serial_uniqueness_excluding_self() {
    let (_, registry, _) = setup();

    let mut first = NewItem::new("AB1234", "Widget");
    first.serial_number = Some("SN1".to_string());
    let first = registry.register(first).unwrap();

    let mut second = NewItem::new("CD5678", "Widget");
    second.serial_number = Some("SN2".to_string());
    let second = registry.register(second).unwrap();

    // Re-saving the item's own serial is not a conflict.
    registry
        .update_descriptive(
            first.id_typed(),
            DescriptiveUpdate {
                name: "Widget".to_string(),
                product_type: None,
                brand: None,
                model: None,
                description: None,
                serial_number: Some("SN1".to_string()),
            },
        )
        .unwrap();

    // Taking another item's serial is.
    let err = registry
        .update_descriptive(
            second.id_typed(),
            DescriptiveUpdate {
                name: "Widget".to_string(),
                product_type: None,
                brand: None,
                model: None,
                description: None,
                serial_number: Some("SN1".to_string()),
            },
        )
        .unwrap_err();
    assert_eq!(err.validation_code(), Some(ValidationCode::SerialDuplicate));
}

#[test]
fn removal_is_blocked_while_history_exists() {
    let (_, registry, ledger) = setup();
    let item = registry.register(NewItem::new("AB1234", "Widget")).unwrap();
    ledger.move_item(MoveRequest::new("AB1234", "Office")).unwrap();

    match registry.remove(item.id_typed()).unwrap_err() {
        DomainError::Conflict(_) => {}
        other => panic!("expected conflict, got {other:?}"),
    }

    // A never-moved item removes cleanly.
    let fresh = registry.register(NewItem::new("CD5678", "Widget")).unwrap();
    registry.remove(fresh.id_typed()).unwrap();
    assert!(registry.find_by_barcode("CD5678").unwrap().is_none());

    match registry.remove(fresh.id_typed()).unwrap_err() {
        DomainError::NotFound => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn reads_are_idempotent_without_intervening_writes() {
    let (_, registry, ledger) = setup();
    registry.register(NewItem::new("AB1234", "Widget")).unwrap();
    ledger.move_item(MoveRequest::new("AB1234", "Office")).unwrap();

    let a = registry.find_by_barcode("AB1234").unwrap();
    let b = registry.find_by_barcode("AB1234").unwrap();
    assert_eq!(a, b);

    let h1 = ledger.history(Some("AB1234")).unwrap();
    let h2 = ledger.history(Some("AB1234")).unwrap();
    assert_eq!(h1, h2);
}

#[test]
fn list_filters_and_orders_by_recency() {
    let (_, registry, ledger) = setup();

    let mut printer = NewItem::new("AB1111", "Thermal Printer");
    printer.product_type = Some("Printer".to_string());
    printer.brand = Some("Acme".to_string());
    registry.register(printer).unwrap();

    let mut scanner = NewItem::new("AB2222", "Handheld Scanner");
    scanner.product_type = Some("Scanner".to_string());
    scanner.brand = Some("Acme".to_string());
    registry.register(scanner).unwrap();

    ledger.move_item(MoveRequest::new("AB2222", "Office")).unwrap();

    // Newest registration first.
    let all = registry.list(&ItemFilter::any()).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].barcode, "AB2222");

    let mut by_type = ItemFilter::any();
    by_type.product_type = Some("Printer".to_string());
    let listed = registry.list(&by_type).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].barcode, "AB1111");

    let mut in_stock = ItemFilter::any();
    in_stock.in_stock_only = true;
    let listed = registry.list(&in_stock).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].barcode, "AB1111");
    assert!(listed[0].in_stock);

    let mut by_term = ItemFilter::any();
    by_term.term = Some("Handheld".to_string());
    let listed = registry.list(&by_term).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].barcode, "AB2222");
    assert_eq!(listed[0].location, "Office");
}

#[test]
fn history_without_barcode_spans_the_ledger() {
    let (_, registry, ledger) = setup();
    registry.register(NewItem::new("AB1111", "Widget")).unwrap();
    registry.register(NewItem::new("AB2222", "Widget")).unwrap();

    ledger.move_item(MoveRequest::new("AB1111", "Office")).unwrap();
    ledger.move_item(MoveRequest::new("AB2222", "Office")).unwrap();
    ledger.move_item(MoveRequest::new("AB1111", "Storage")).unwrap();

    let all = ledger.history(None).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].barcode.as_str(), "AB1111");
    assert_eq!(all[0].kind, MovementKind::Entry);

    // Blank filter behaves like no filter.
    assert_eq!(ledger.history(Some("  ")).unwrap().len(), 3);
}

#[test]
fn concurrent_moves_on_one_barcode_stay_consistent() {
    let (store, registry, _) = setup();
    registry.register(NewItem::new("AB1234", "Widget")).unwrap();

    let targets = ["Office", "Out-of-stock"];
    let mut handles = Vec::new();
    for target in targets {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            let ledger = MovementLedger::new(store);
            ledger.move_item(MoveRequest::new("AB1234", target)).map(|r| r.target_location)
        }));
    }

    let outcomes: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("mover thread panicked"))
        .collect();

    let successes: Vec<_> = outcomes.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert!(!successes.is_empty(), "at least one move must apply");
    for failure in outcomes.iter().filter_map(|r| r.as_ref().err()) {
        match failure {
            DomainError::Conflict(_) => {}
            other => panic!("loser must fail with a conflict, got {other:?}"),
        }
    }

    // Ledger record count equals the number of reported successes, and the
    // item's final location is the last applied record's target.
    let ledger = MovementLedger::new(Arc::clone(&store));
    let history = ledger.history(Some("AB1234")).unwrap();
    assert_eq!(history.len(), successes.len());

    let registry = ItemRegistry::new(store);
    let item = registry.find_by_barcode("AB1234").unwrap().unwrap();
    assert_eq!(item.location(), &history[0].target_location);
    assert!(successes.contains(&item.location()));
}
