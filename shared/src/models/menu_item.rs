//! Menu item

use serde::{Deserialize, Serialize};

/// A menu item as configured by the tenant
///
/// Only the fields the routing engine cares about: the station binding is
/// copied onto order lines at submission time, so later menu edits do not
/// affect existing orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub price: f64,
    /// Station this item's lines route to; `None` = dashboard only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<String>,
}

impl MenuItem {
    pub fn new(tenant_id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: tenant_id.into(),
            name: name.into(),
            price,
            station_id: None,
        }
    }
}
