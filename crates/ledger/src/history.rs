//! History ordering.

use crate::movement::MovementRecord;

/// Order records most recent first: `occurred_at` descending, ties broken
/// by descending record id. Ids are UUIDv7, so the tiebreak follows append
/// order within a single timestamp.
pub fn sort_most_recent_first(records: &mut [MovementRecord]) {
    records.sort_by(|a, b| {
        b.occurred_at
            .cmp(&a.occurred_at)
            .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::MovementRecord;
    use chrono::{Duration, Utc};
    use stocktrace_core::Location;
    use stocktrace_registry::{Item, NewItem};

    #[test]
    fn orders_by_time_then_id_descending() {
        let item = Item::register(NewItem::new("AB1234", "Widget")).unwrap();
        let t0 = Utc::now();

        let older = MovementRecord::for_move(
            &item,
            Location::parse("Office").unwrap(),
            None,
            None,
            t0 - Duration::seconds(60),
        );
        // Two records sharing a timestamp: the later-assigned id wins.
        let tied_first = MovementRecord::for_move(&item, Location::storage(), None, None, t0);
        let tied_second =
            MovementRecord::for_move(&item, Location::parse("Office").unwrap(), None, None, t0);

        let mut records = vec![older.clone(), tied_first.clone(), tied_second.clone()];
        sort_most_recent_first(&mut records);

        assert_eq!(records[0].id, tied_second.id);
        assert_eq!(records[1].id, tied_first.id);
        assert_eq!(records[2].id, older.id);
    }
}
