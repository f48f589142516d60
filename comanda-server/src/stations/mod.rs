//! Station registry
//!
//! Tenant-scoped kitchen stations and their menu-item bindings. Stations
//! are display identity only; the routing engine matches on `station_id`.

use crate::db::{RetryPolicy, Storage, with_retry};
use crate::utils::{AppError, AppResult};
use shared::models::{MenuItem, Station};

/// Station and menu-item registry over the persistence gateway
pub struct StationRegistry {
    storage: Storage,
    retry: RetryPolicy,
}

impl StationRegistry {
    pub fn new(storage: Storage, retry: RetryPolicy) -> Self {
        Self { storage, retry }
    }

    /// Create a named station.
    pub async fn create_station(
        &self,
        tenant_id: &str,
        name: &str,
        color: &str,
    ) -> AppResult<Station> {
        if name.trim().is_empty() {
            return Err(AppError::validation("station name cannot be empty"));
        }
        let station = Station::new(tenant_id, name.trim(), color);
        with_retry(&self.retry, "upsert_station", || {
            self.storage.upsert_station(&station)
        })
        .await?;
        tracing::info!(station_id = %station.id, tenant_id, name = %station.name, "Station created");
        Ok(station)
    }

    /// All stations for a tenant, sorted by name.
    pub async fn list_stations(&self, tenant_id: &str) -> AppResult<Vec<Station>> {
        Ok(with_retry(&self.retry, "list_stations", || {
            self.storage.list_stations(tenant_id)
        })
        .await?)
    }

    /// Delete a station.
    ///
    /// Unassigns `station_id` on every menu item that referenced it, so
    /// new orders stop routing there. Historical order lines are never
    /// rewritten: their station binding is part of the submitted snapshot.
    pub async fn delete_station(&self, tenant_id: &str, station_id: &str) -> AppResult<()> {
        let existed = with_retry(&self.retry, "delete_station", || {
            self.storage.delete_station(tenant_id, station_id)
        })
        .await?;
        if !existed {
            return Err(AppError::not_found(format!(
                "Station {} not found",
                station_id
            )));
        }

        let unassigned = with_retry(&self.retry, "unassign_station_from_menu", || {
            self.storage.unassign_station_from_menu(tenant_id, station_id)
        })
        .await?;
        tracing::info!(station_id, tenant_id, unassigned, "Station deleted");
        Ok(())
    }

    /// Insert or overwrite a menu item.
    pub async fn upsert_menu_item(&self, item: &MenuItem) -> AppResult<()> {
        with_retry(&self.retry, "upsert_menu_item", || {
            self.storage.upsert_menu_item(item)
        })
        .await?;
        Ok(())
    }

    /// All menu items for a tenant.
    pub async fn list_menu_items(&self, tenant_id: &str) -> AppResult<Vec<MenuItem>> {
        Ok(with_retry(&self.retry, "list_menu_items", || {
            self.storage.list_menu_items(tenant_id)
        })
        .await?)
    }
}
