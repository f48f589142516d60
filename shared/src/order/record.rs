//! Order record and status machine

use super::types::{OrderLine, PreparedMark};
use serde::{Deserialize, Serialize};

/// Order status
///
/// `Pending` is the only initial state. `Completed` and `Cancelled` are
/// terminal: no transition ever leaves them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

/// An order as stored and broadcast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Server-assigned opaque ID
    pub id: String,
    /// Owning restaurant
    pub tenant_id: String,
    /// Numeric table, `LLEVAR-<n>` for takeout, or `S/N` if unknown
    pub table_label: String,
    pub status: OrderStatus,
    /// Monetary total, non-negative
    pub total: f64,
    /// Line items in submission order
    pub items: Vec<OrderLine>,
    /// Per-(item, station) prepared flags; grows while pending, may shrink
    /// via explicit undo
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prepared_items: Vec<PreparedMark>,
    /// Submission timestamp (Unix millis, immutable)
    pub created_at: i64,
}

impl Order {
    /// Create a new pending order with a fresh server-assigned ID.
    pub fn new(
        tenant_id: impl Into<String>,
        table_label: impl Into<String>,
        items: Vec<OrderLine>,
        total: f64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: tenant_id.into(),
            table_label: table_label.into(),
            status: OrderStatus::Pending,
            total,
            items,
            prepared_items: Vec::new(),
            created_at: crate::util::now_millis(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether a prepared mark exists for the exact `(item_id, station_id)` pair.
    pub fn is_prepared(&self, item_id: &str, station_id: &str) -> bool {
        self.prepared_items
            .iter()
            .any(|m| m.matches(item_id, station_id))
    }

    /// Takeout pickup number parsed from the table label, if this is a
    /// sequenced takeout order.
    pub fn takeout_sequence(&self) -> Option<u32> {
        self.table_label
            .strip_prefix(super::TAKEOUT_PREFIX)
            .and_then(|n| n.parse().ok())
    }

    pub fn is_takeout(&self) -> bool {
        self.takeout_sequence().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderLine;

    #[test]
    fn test_new_order_is_pending() {
        let order = Order::new("tenant-1", "4", vec![OrderLine::new("x", "Pan", 1.0, 1)], 1.0);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(!order.is_terminal());
        assert!(order.prepared_items.is_empty());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
    }

    #[test]
    fn test_takeout_sequence_parsing() {
        let mut order = Order::new("t", "LLEVAR-17", vec![], 0.0);
        assert_eq!(order.takeout_sequence(), Some(17));
        assert!(order.is_takeout());

        order.table_label = "4".to_string();
        assert_eq!(order.takeout_sequence(), None);

        order.table_label = "LLEVAR-abc".to_string();
        assert_eq!(order.takeout_sequence(), None);
    }

    #[test]
    fn test_status_serializes_screaming_snake() {
        let json = serde_json::to_string(&OrderStatus::Pending).unwrap();
        assert_eq!(json, r#""PENDING""#);
    }
}
