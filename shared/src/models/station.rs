//! Kitchen station

use serde::{Deserialize, Serialize};

/// A named kitchen/bar prep area
///
/// Display-only identity: `name` and `color` drive the KDS header, nothing
/// else. Order lines reference stations by `id`; historical order lines are
/// never rewritten when a station is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Station {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    /// CSS-style color for the KDS header
    pub color: String,
}

impl Station {
    pub fn new(tenant_id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: tenant_id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}
