//! Realtime feed events
//!
//! 订单变更的实时推送载荷。每个事件携带完整的订单快照，消费端以
//! "按 ID 替换" 的方式应用，天然幂等（at-least-once 投递安全）。

use crate::order::Order;
use serde::{Deserialize, Serialize};

/// Feed event kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedEventKind {
    /// A new order was created. Consumers may trigger the "new order"
    /// alert on this kind only.
    OrderInserted,
    /// An existing order changed (status or prepared marks).
    OrderUpdated,
}

/// One realtime notification, scoped to a single tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEvent {
    pub event_id: String,
    pub tenant_id: String,
    /// Emission timestamp (Unix millis)
    pub timestamp: i64,
    pub kind: FeedEventKind,
    /// Full order snapshot after the change
    pub order: Order,
}

impl FeedEvent {
    fn new(kind: FeedEventKind, order: Order) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            tenant_id: order.tenant_id.clone(),
            timestamp: crate::util::now_millis(),
            kind,
            order,
        }
    }

    pub fn inserted(order: Order) -> Self {
        Self::new(FeedEventKind::OrderInserted, order)
    }

    pub fn updated(order: Order) -> Self {
        Self::new(FeedEventKind::OrderUpdated, order)
    }

    pub fn is_insert(&self) -> bool {
        self.kind == FeedEventKind::OrderInserted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_carries_tenant_of_order() {
        let order = Order::new("tenant-9", "4", vec![], 0.0);
        let event = FeedEvent::inserted(order);
        assert_eq!(event.tenant_id, "tenant-9");
        assert!(event.is_insert());
    }
}
