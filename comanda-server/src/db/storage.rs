//! redb-based storage for orders, stations and menu items
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `(tenant_id, order_id)` | `Order` | Authoritative order rows |
//! | `pending_orders` | `(tenant_id, order_id)` | `()` | Pending order index |
//! | `kitchen_stations` | `(tenant_id, station_id)` | `Station` | Station registry |
//! | `menu_items` | `(tenant_id, item_id)` | `MenuItem` | Menu items (station binding) |
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns (copy-on-write
//! with atomic pointer swap), which matters for on-premise boxes that get
//! power-cycled without warning.
//!
//! # Schema tolerance
//!
//! Rows written by a build with a different optional-field layout are
//! decoded leniently: if a row fails to decode, the optional fields are
//! stripped and decoding is retried before an error is surfaced. Required
//! fields failing still surface an error.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::models::{MenuItem, Station};
use shared::order::{Order, OrderStatus};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Orders: key = (tenant_id, order_id), value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("orders");

/// Pending order index: key = (tenant_id, order_id), value = empty (existence check)
const PENDING_ORDERS_TABLE: TableDefinition<(&str, &str), ()> =
    TableDefinition::new("pending_orders");

/// Stations: key = (tenant_id, station_id), value = JSON-serialized Station
const STATIONS_TABLE: TableDefinition<(&str, &str), &[u8]> =
    TableDefinition::new("kitchen_stations");

/// Menu items: key = (tenant_id, item_id), value = JSON-serialized MenuItem
const MENU_ITEMS_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("menu_items");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(String),
}

impl StorageError {
    /// Whether the error is worth retrying.
    ///
    /// Only I/O-level failures qualify; schema and lookup failures are
    /// deterministic and retrying them cannot succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StorageError::Io(_) | StorageError::Storage(redb::StorageError::Io(_))
        )
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Multi-tenant storage backed by redb
#[derive(Clone)]
pub struct Storage {
    db: Arc<Database>,
}

impl Storage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Create all tables if they don't exist
    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(PENDING_ORDERS_TABLE)?;
            let _ = write_txn.open_table(STATIONS_TABLE)?;
            let _ = write_txn.open_table(MENU_ITEMS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    // ========== Order Operations ==========

    /// Insert a new order and index it as pending
    pub fn insert_order(&self, order: &Order) -> StorageResult<()> {
        self.put_order(order)
    }

    /// Overwrite an order row (last write wins) and sync the pending index
    pub fn update_order(&self, order: &Order) -> StorageResult<()> {
        self.put_order(order)
    }

    fn put_order(&self, order: &Order) -> StorageResult<()> {
        let value = serde_json::to_vec(order)?;
        let key = (order.tenant_id.as_str(), order.id.as_str());

        let txn = self.db.begin_write()?;
        {
            let mut orders = txn.open_table(ORDERS_TABLE)?;
            orders.insert(key, value.as_slice())?;

            let mut pending = txn.open_table(PENDING_ORDERS_TABLE)?;
            if order.is_pending() {
                pending.insert(key, ())?;
            } else {
                pending.remove(key)?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    /// Get a single order
    pub fn get_order(&self, tenant_id: &str, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get((tenant_id, order_id))? {
            Some(guard) => Ok(Some(decode_order(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All orders for a tenant, newest first
    pub fn list_orders(&self, tenant_id: &str) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            if key.value().0 != tenant_id {
                continue;
            }
            match decode_order(value.value()) {
                Ok(order) => orders.push(order),
                // One undecodable row must not hide the rest of the tenant's orders
                Err(e) => {
                    tracing::error!(order_id = key.value().1, error = %e, "Skipping undecodable order row")
                }
            }
        }

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Orders for a tenant filtered by status, newest first
    pub fn list_orders_by_status(
        &self,
        tenant_id: &str,
        status: OrderStatus,
    ) -> StorageResult<Vec<Order>> {
        let mut orders = self.list_orders(tenant_id)?;
        orders.retain(|o| o.status == status);
        Ok(orders)
    }

    /// Pending orders for a tenant via the pending index, newest first
    pub fn list_pending(&self, tenant_id: &str) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(PENDING_ORDERS_TABLE)?;
        let orders_table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for entry in index.iter()? {
            let (key, _) = entry?;
            let (tenant, order_id) = key.value();
            if tenant != tenant_id {
                continue;
            }
            match orders_table.get((tenant, order_id))? {
                Some(guard) => match decode_order(guard.value()) {
                    Ok(order) => orders.push(order),
                    Err(e) => {
                        tracing::error!(order_id, error = %e, "Skipping undecodable pending order")
                    }
                },
                None => {
                    tracing::warn!(order_id, "Pending index entry without order row");
                }
            }
        }

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    // ========== Station Operations ==========

    /// Insert or overwrite a station
    pub fn upsert_station(&self, station: &Station) -> StorageResult<()> {
        let value = serde_json::to_vec(station)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(STATIONS_TABLE)?;
            table.insert((station.tenant_id.as_str(), station.id.as_str()), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Get a single station
    pub fn get_station(&self, tenant_id: &str, station_id: &str) -> StorageResult<Option<Station>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STATIONS_TABLE)?;
        match table.get((tenant_id, station_id))? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All stations for a tenant, sorted by name
    pub fn list_stations(&self, tenant_id: &str) -> StorageResult<Vec<Station>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STATIONS_TABLE)?;

        let mut stations = Vec::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            if key.value().0 != tenant_id {
                continue;
            }
            stations.push(serde_json::from_slice::<Station>(value.value())?);
        }

        stations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(stations)
    }

    /// Delete a station. Returns whether it existed.
    pub fn delete_station(&self, tenant_id: &str, station_id: &str) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let existed;
        {
            let mut table = txn.open_table(STATIONS_TABLE)?;
            existed = table.remove((tenant_id, station_id))?.is_some();
        }
        txn.commit()?;
        Ok(existed)
    }

    // ========== Menu Item Operations ==========

    /// Insert or overwrite a menu item
    pub fn upsert_menu_item(&self, item: &MenuItem) -> StorageResult<()> {
        let value = serde_json::to_vec(item)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(MENU_ITEMS_TABLE)?;
            table.insert((item.tenant_id.as_str(), item.id.as_str()), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// All menu items for a tenant
    pub fn list_menu_items(&self, tenant_id: &str) -> StorageResult<Vec<MenuItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENU_ITEMS_TABLE)?;

        let mut items = Vec::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            if key.value().0 != tenant_id {
                continue;
            }
            items.push(serde_json::from_slice::<MenuItem>(value.value())?);
        }
        Ok(items)
    }

    /// Clear `station_id` on every menu item referencing the given station.
    ///
    /// Historical order lines are left untouched: orders are immutable
    /// snapshots of what the diner submitted.
    pub fn unassign_station_from_menu(
        &self,
        tenant_id: &str,
        station_id: &str,
    ) -> StorageResult<usize> {
        let txn = self.db.begin_write()?;
        let mut updated = 0;
        {
            let mut table = txn.open_table(MENU_ITEMS_TABLE)?;

            let mut changed: Vec<(String, Vec<u8>)> = Vec::new();
            for entry in table.iter()? {
                let (key, value) = entry?;
                let (tenant, item_id) = key.value();
                if tenant != tenant_id {
                    continue;
                }
                let mut item: MenuItem = serde_json::from_slice(value.value())?;
                if item.station_id.as_deref() == Some(station_id) {
                    item.station_id = None;
                    changed.push((item_id.to_string(), serde_json::to_vec(&item)?));
                }
            }

            for (item_id, bytes) in changed {
                table.insert((tenant_id, item_id.as_str()), bytes.as_slice())?;
                updated += 1;
            }
        }
        txn.commit()?;
        Ok(updated)
    }
}

/// Decode an order row, tolerating optional-field schema drift.
fn decode_order(bytes: &[u8]) -> StorageResult<Order> {
    match serde_json::from_slice(bytes) {
        Ok(order) => Ok(order),
        Err(primary) => {
            let Ok(mut value) = serde_json::from_slice::<serde_json::Value>(bytes) else {
                return Err(StorageError::Serialization(primary));
            };
            strip_optional_fields(&mut value);
            match serde_json::from_value(value) {
                Ok(order) => {
                    tracing::warn!(
                        error = %primary,
                        "Order row decoded without optional fields (schema drift)"
                    );
                    Ok(order)
                }
                Err(_) => Err(StorageError::Serialization(primary)),
            }
        }
    }
}

/// Remove the optional fields an older or newer build may have written
/// with a different shape.
fn strip_optional_fields(value: &mut serde_json::Value) {
    let Some(map) = value.as_object_mut() else {
        return;
    };
    map.remove("prepared_items");
    if let Some(items) = map.get_mut("items").and_then(|v| v.as_array_mut()) {
        for item in items {
            if let Some(line) = item.as_object_mut() {
                line.remove("notes");
                line.remove("station_id");
                line.remove("selected_options");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::OrderLine;

    fn make_order(tenant: &str, table: &str) -> Order {
        Order::new(
            tenant,
            table,
            vec![OrderLine::new("item-1", "Tortilla", 4.5, 2)],
            9.0,
        )
    }

    #[test]
    fn test_order_roundtrip() {
        let storage = Storage::open_in_memory().unwrap();
        let order = make_order("t1", "4");
        storage.insert_order(&order).unwrap();

        let loaded = storage.get_order("t1", &order.id).unwrap().unwrap();
        assert_eq!(loaded, order);
    }

    #[test]
    fn test_pending_index_follows_status() {
        let storage = Storage::open_in_memory().unwrap();
        let mut order = make_order("t1", "4");
        storage.insert_order(&order).unwrap();
        assert_eq!(storage.list_pending("t1").unwrap().len(), 1);

        order.status = OrderStatus::Completed;
        storage.update_order(&order).unwrap();
        assert!(storage.list_pending("t1").unwrap().is_empty());
        assert_eq!(
            storage
                .list_orders_by_status("t1", OrderStatus::Completed)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_tenant_isolation() {
        let storage = Storage::open_in_memory().unwrap();
        storage.insert_order(&make_order("t1", "4")).unwrap();
        storage.insert_order(&make_order("t2", "7")).unwrap();

        assert_eq!(storage.list_orders("t1").unwrap().len(), 1);
        assert_eq!(storage.list_orders("t2").unwrap().len(), 1);
        assert!(storage.list_orders("t3").unwrap().is_empty());
    }

    #[test]
    fn test_list_orders_newest_first() {
        let storage = Storage::open_in_memory().unwrap();
        let mut first = make_order("t1", "1");
        first.created_at = 1000;
        let mut second = make_order("t1", "2");
        second.created_at = 2000;
        storage.insert_order(&first).unwrap();
        storage.insert_order(&second).unwrap();

        let orders = storage.list_orders("t1").unwrap();
        assert_eq!(orders[0].table_label, "2");
        assert_eq!(orders[1].table_label, "1");
    }

    #[test]
    fn test_station_delete_unassigns_menu_items() {
        let storage = Storage::open_in_memory().unwrap();
        let station = Station::new("t1", "Plancha", "#ff0000");
        storage.upsert_station(&station).unwrap();

        let mut item = MenuItem::new("t1", "Tortilla", 4.5);
        item.station_id = Some(station.id.clone());
        storage.upsert_menu_item(&item).unwrap();

        assert!(storage.delete_station("t1", &station.id).unwrap());
        let updated = storage
            .unassign_station_from_menu("t1", &station.id)
            .unwrap();
        assert_eq!(updated, 1);
        assert!(storage.list_menu_items("t1").unwrap()[0].station_id.is_none());
    }

    #[test]
    fn test_lenient_decode_drops_bad_optional_fields() {
        let raw = serde_json::json!({
            "id": "o-1",
            "tenant_id": "t1",
            "table_label": "4",
            "status": "PENDING",
            "total": 9.0,
            "items": [{
                "item_id": "item-1",
                "name": "Tortilla",
                "price": "4.50",
                "quantity": 2,
                "selected_options": "not-an-array"
            }],
            "prepared_items": 42,
            "created_at": 1000
        });
        let bytes = serde_json::to_vec(&raw).unwrap();
        let order = decode_order(&bytes).unwrap();
        assert_eq!(order.items.len(), 1);
        assert!(order.prepared_items.is_empty());
        assert!(order.items[0].selected_options.is_none());
    }

    #[test]
    fn test_lenient_decode_still_fails_on_required_fields() {
        let raw = serde_json::json!({ "id": "o-1" });
        let bytes = serde_json::to_vec(&raw).unwrap();
        assert!(decode_order(&bytes).is_err());
    }
}
