//! Postgres-backed item + ledger store.
//!
//! Persists items and movement records in PostgreSQL (see `schema.sql` in
//! this directory for the expected DDL). Uniqueness lives in the database's
//! unique constraints, optimistic concurrency in version-guarded updates,
//! and the move commit in a single transaction.
//!
//! ## Error Mapping
//!
//! | SQLx error | Postgres code | StoreError | Scenario |
//! |------------|---------------|------------|----------|
//! | Database (unique violation) | `23505` on `items_barcode_key` | `Duplicate(Barcode)` | barcode already registered |
//! | Database (unique violation) | `23505` on `items_serial_number_key` | `Duplicate(SerialNumber)` | serial already registered |
//! | Database (other) | any other | `Backend` | constraint/connectivity problems |
//! | PoolClosed / network / ... | n/a | `Backend` | possibly transient, caller may retry |
//!
//! A version-guarded `UPDATE` matching zero rows is resolved to `NotFound`
//! or `Concurrency` with a follow-up existence check inside the same
//! transaction.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::sync::Arc;
use tracing::instrument;

use stocktrace_core::{Barcode, ItemId, Location, MovementId};
use stocktrace_ledger::{MovementKind, MovementRecord};
use stocktrace_registry::{Item, ItemFilter};

use super::r#trait::{InventoryStore, StoreError, UniqueField};

/// Postgres implementation of [`InventoryStore`].
///
/// Uses the SQLx connection pool (thread-safe, `Send + Sync`). The
/// synchronous trait surface bridges into async via the ambient tokio
/// runtime handle, matching how the in-memory store is consumed.
#[derive(Debug, Clone)]
pub struct PostgresInventoryStore {
    pool: Arc<PgPool>,
}

impl PostgresInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    #[instrument(skip(self, item), fields(barcode = %item.barcode()), err)]
    pub async fn insert_item_async(&self, item: &Item) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO items (
                id, barcode, name, product_type, brand, model, description,
                serial_number, created_at, location, current_holder, version
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(item.id_typed().as_uuid())
        .bind(item.barcode().as_str())
        .bind(item.name())
        .bind(item.product_type())
        .bind(item.brand())
        .bind(item.model())
        .bind(item.description())
        .bind(item.serial_number())
        .bind(item.created_at())
        .bind(item.location().as_str())
        .bind(item.current_holder())
        .bind(item.version() as i64)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_item", e))?;

        Ok(())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn item_by_id_async(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query(&format!("{ITEM_SELECT} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("item_by_id", e))?;

        row.map(|r| item_from_row(&r)).transpose()
    }

    #[instrument(skip(self), fields(barcode = %barcode), err)]
    pub async fn item_by_barcode_async(
        &self,
        barcode: &Barcode,
    ) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query(&format!("{ITEM_SELECT} WHERE barcode = $1"))
            .bind(barcode.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("item_by_barcode", e))?;

        row.map(|r| item_from_row(&r)).transpose()
    }

    #[instrument(skip(self, item), fields(barcode = %item.barcode()), err)]
    pub async fn update_item_async(
        &self,
        item: &Item,
        expected_version: u64,
    ) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let result = sqlx::query(
            r#"
            UPDATE items
            SET name = $3, product_type = $4, brand = $5, model = $6,
                description = $7, serial_number = $8, location = $9,
                current_holder = $10, version = $11
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(item.id_typed().as_uuid())
        .bind(expected_version as i64)
        .bind(item.name())
        .bind(item.product_type())
        .bind(item.brand())
        .bind(item.model())
        .bind(item.description())
        .bind(item.serial_number())
        .bind(item.location().as_str())
        .bind(item.current_holder())
        .bind(item.version() as i64)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_item", e))?;

        if result.rows_affected() == 0 {
            let err = resolve_missed_update(&mut tx, item.id_typed(), expected_version).await?;
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(err);
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn remove_item_async(&self, id: ItemId) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let row = sqlx::query("SELECT barcode FROM items WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("remove_item", e))?;

        let barcode: String = match row {
            Some(r) => r
                .try_get("barcode")
                .map_err(|e| StoreError::Backend(format!("failed to read barcode: {e}")))?,
            None => {
                tx.rollback()
                    .await
                    .map_err(|e| map_sqlx_error("rollback", e))?;
                return Err(StoreError::NotFound);
            }
        };

        let referenced: bool =
            sqlx::query("SELECT EXISTS(SELECT 1 FROM movements WHERE barcode = $1) AS referenced")
                .bind(&barcode)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("remove_item", e))?
                .try_get("referenced")
                .map_err(|e| StoreError::Backend(format!("failed to read existence flag: {e}")))?;

        if referenced {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(StoreError::HistoryRetained);
        }

        sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("remove_item", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))
    }

    #[instrument(skip(self, filter), err)]
    pub async fn list_items_async(
        &self,
        filter: &ItemFilter,
        limit: usize,
    ) -> Result<Vec<Item>, StoreError> {
        let rows = sqlx::query(&format!(
            r#"
            {ITEM_SELECT}
            WHERE ($1::text IS NULL OR product_type = $1)
              AND ($2::text IS NULL OR brand = $2)
              AND ($3::text IS NULL OR location = $3)
              AND ($4::text IS NULL OR serial_number LIKE '%' || $4 || '%')
              AND ($5::text IS NULL OR (
                    barcode LIKE '%' || $5 || '%'
                 OR name LIKE '%' || $5 || '%'
                 OR brand LIKE '%' || $5 || '%'
                 OR model LIKE '%' || $5 || '%'
                 OR serial_number LIKE '%' || $5 || '%'))
              AND ($6::bool IS NOT TRUE OR location = $7)
            ORDER BY id DESC
            LIMIT $8
            "#
        ))
        .bind(non_blank(&filter.product_type))
        .bind(non_blank(&filter.brand))
        .bind(non_blank(&filter.location))
        .bind(non_blank(&filter.serial))
        .bind(non_blank(&filter.term))
        .bind(filter.in_stock_only)
        .bind(Location::STORAGE)
        .bind(limit as i64)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_items", e))?;

        rows.iter().map(item_from_row).collect()
    }

    #[instrument(
        skip(self, item, record),
        fields(barcode = %item.barcode(), target = %record.target_location),
        err
    )]
    pub async fn commit_move_async(
        &self,
        item: &Item,
        expected_version: u64,
        record: MovementRecord,
    ) -> Result<MovementRecord, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let result = sqlx::query(
            r#"
            UPDATE items
            SET location = $3, current_holder = $4, version = $5
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(item.id_typed().as_uuid())
        .bind(expected_version as i64)
        .bind(item.location().as_str())
        .bind(item.current_holder())
        .bind(item.version() as i64)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("commit_move", e))?;

        if result.rows_affected() == 0 {
            let err = resolve_missed_update(&mut tx, item.id_typed(), expected_version).await?;
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(err);
        }

        sqlx::query(
            r#"
            INSERT INTO movements (
                id, barcode, kind, quantity, target_location,
                performed_by, note, occurred_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.barcode.as_str())
        .bind(record.kind.as_str())
        .bind(record.quantity as i32)
        .bind(record.target_location.as_str())
        .bind(record.performed_by.as_deref())
        .bind(record.note.as_deref())
        .bind(record.occurred_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("commit_move", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(record)
    }

    #[instrument(skip(self), err)]
    pub async fn movements_async(
        &self,
        barcode: Option<&str>,
        limit: usize,
    ) -> Result<Vec<MovementRecord>, StoreError> {
        let rows = sqlx::query(&format!(
            r#"
            {MOVEMENT_SELECT}
            WHERE ($1::text IS NULL OR barcode = $1)
            ORDER BY occurred_at DESC, id DESC
            LIMIT $2
            "#
        ))
        .bind(barcode)
        .bind(limit as i64)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("movements", e))?;

        rows.iter().map(movement_from_row).collect()
    }

    #[instrument(skip(self), err)]
    pub async fn has_movements_async(&self, barcode: &str) -> Result<bool, StoreError> {
        sqlx::query("SELECT EXISTS(SELECT 1 FROM movements WHERE barcode = $1) AS referenced")
            .bind(barcode)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("has_movements", e))?
            .try_get("referenced")
            .map_err(|e| StoreError::Backend(format!("failed to read existence flag: {e}")))
    }
}

const ITEM_SELECT: &str = r#"
    SELECT id, barcode, name, product_type, brand, model, description,
           serial_number, created_at, location, current_holder, version
    FROM items"#;

const MOVEMENT_SELECT: &str = r#"
    SELECT id, barcode, kind, quantity, target_location,
           performed_by, note, occurred_at
    FROM movements"#;

/// Distinguish `NotFound` from `Concurrency` after a version-guarded update
/// matched no rows.
async fn resolve_missed_update(
    tx: &mut Transaction<'_, Postgres>,
    id: ItemId,
    expected_version: u64,
) -> Result<StoreError, StoreError> {
    let row = sqlx::query("SELECT version FROM items WHERE id = $1")
        .bind(id.as_uuid())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("resolve_missed_update", e))?;

    Ok(match row {
        None => StoreError::NotFound,
        Some(r) => {
            let found: i64 = r
                .try_get("version")
                .map_err(|e| StoreError::Backend(format!("failed to read version: {e}")))?;
            StoreError::Concurrency(format!(
                "expected version {expected_version}, found {found}"
            ))
        }
    })
}

fn item_from_row(row: &sqlx::postgres::PgRow) -> Result<Item, StoreError> {
    let corrupt = |e: String| StoreError::Backend(format!("corrupt item row: {e}"));

    let id: uuid::Uuid = row.try_get("id").map_err(|e| corrupt(e.to_string()))?;
    let barcode: String = row.try_get("barcode").map_err(|e| corrupt(e.to_string()))?;
    let location: String = row.try_get("location").map_err(|e| corrupt(e.to_string()))?;
    let version: i64 = row.try_get("version").map_err(|e| corrupt(e.to_string()))?;
    let created_at: Option<DateTime<Utc>> = row
        .try_get("created_at")
        .map_err(|e| corrupt(e.to_string()))?;

    let barcode = Barcode::parse(&barcode).map_err(|e| corrupt(e.to_string()))?;
    let location = Location::parse(&location).map_err(|e| corrupt(e.to_string()))?;

    Ok(Item::from_parts(
        ItemId::from_uuid(id),
        barcode,
        row.try_get("name").map_err(|e| corrupt(e.to_string()))?,
        row.try_get("product_type")
            .map_err(|e| corrupt(e.to_string()))?,
        row.try_get("brand").map_err(|e| corrupt(e.to_string()))?,
        row.try_get("model").map_err(|e| corrupt(e.to_string()))?,
        row.try_get("description")
            .map_err(|e| corrupt(e.to_string()))?,
        row.try_get("serial_number")
            .map_err(|e| corrupt(e.to_string()))?,
        created_at,
        location,
        row.try_get("current_holder")
            .map_err(|e| corrupt(e.to_string()))?,
        version as u64,
    ))
}

fn movement_from_row(row: &sqlx::postgres::PgRow) -> Result<MovementRecord, StoreError> {
    let corrupt = |e: String| StoreError::Backend(format!("corrupt movement row: {e}"));

    let id: uuid::Uuid = row.try_get("id").map_err(|e| corrupt(e.to_string()))?;
    let barcode: String = row.try_get("barcode").map_err(|e| corrupt(e.to_string()))?;
    let kind: String = row.try_get("kind").map_err(|e| corrupt(e.to_string()))?;
    let quantity: i32 = row.try_get("quantity").map_err(|e| corrupt(e.to_string()))?;
    let target: String = row
        .try_get("target_location")
        .map_err(|e| corrupt(e.to_string()))?;

    let kind = match kind.as_str() {
        "entry" => MovementKind::Entry,
        "exit" => MovementKind::Exit,
        other => return Err(corrupt(format!("unknown movement kind {other:?}"))),
    };

    Ok(MovementRecord {
        id: MovementId::from_uuid(id),
        barcode: Barcode::parse(&barcode).map_err(|e| corrupt(e.to_string()))?,
        kind,
        quantity: quantity as u32,
        target_location: Location::parse(&target).map_err(|e| corrupt(e.to_string()))?,
        performed_by: row
            .try_get("performed_by")
            .map_err(|e| corrupt(e.to_string()))?,
        note: row.try_get("note").map_err(|e| corrupt(e.to_string()))?,
        occurred_at: row
            .try_get("occurred_at")
            .map_err(|e| corrupt(e.to_string()))?,
    })
}

/// Blank filter values mean "no constraint" at the SQL layer too.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                return match db_err.constraint() {
                    Some("items_serial_number_key") => {
                        StoreError::Duplicate(UniqueField::SerialNumber)
                    }
                    _ => StoreError::Duplicate(UniqueField::Barcode),
                };
            }
            StoreError::Backend(format!(
                "database error in {operation}: {}",
                db_err.message()
            ))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {operation}"))
        }
        other => StoreError::Backend(format!("sqlx error in {operation}: {other}")),
    }
}

fn runtime_handle() -> Result<tokio::runtime::Handle, StoreError> {
    tokio::runtime::Handle::try_current().map_err(|_| {
        StoreError::Backend(
            "PostgresInventoryStore requires an ambient tokio runtime".to_string(),
        )
    })
}

// The store trait is synchronous (the in-memory implementation and the
// services have no async surface), so Postgres operations bridge through
// the ambient runtime handle.

impl InventoryStore for PostgresInventoryStore {
    fn insert_item(&self, item: Item) -> Result<(), StoreError> {
        runtime_handle()?.block_on(self.insert_item_async(&item))
    }

    fn item_by_id(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        runtime_handle()?.block_on(self.item_by_id_async(id))
    }

    fn item_by_barcode(&self, barcode: &Barcode) -> Result<Option<Item>, StoreError> {
        runtime_handle()?.block_on(self.item_by_barcode_async(barcode))
    }

    fn update_item(&self, item: &Item, expected_version: u64) -> Result<(), StoreError> {
        runtime_handle()?.block_on(self.update_item_async(item, expected_version))
    }

    fn remove_item(&self, id: ItemId) -> Result<(), StoreError> {
        runtime_handle()?.block_on(self.remove_item_async(id))
    }

    fn list_items(&self, filter: &ItemFilter, limit: usize) -> Result<Vec<Item>, StoreError> {
        runtime_handle()?.block_on(self.list_items_async(filter, limit))
    }

    fn commit_move(
        &self,
        item: &Item,
        expected_version: u64,
        record: MovementRecord,
    ) -> Result<MovementRecord, StoreError> {
        runtime_handle()?.block_on(self.commit_move_async(item, expected_version, record))
    }

    fn movements(
        &self,
        barcode: Option<&str>,
        limit: usize,
    ) -> Result<Vec<MovementRecord>, StoreError> {
        runtime_handle()?.block_on(self.movements_async(barcode, limit))
    }

    fn has_movements(&self, barcode: &str) -> Result<bool, StoreError> {
        runtime_handle()?.block_on(self.has_movements_async(barcode))
    }
}
