//! System request classification and bill consolidation
//!
//! Bill and help requests flow through the same order pipe as food orders
//! so they get the same realtime delivery and print path, but they are
//! synthetic: a single sentinel line, zero total, routed to the bill
//! printer role instead of a food station.

use serde::Serialize;
use shared::order::{BILL_REQUEST_ITEM, HELP_REQUEST_ITEM, Order, OrderLine};

/// Default message shown for a help request with a blank note
pub const DEFAULT_HELP_MESSAGE: &str = "El cliente solicita asistencia";

/// Kind of synthetic order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemRequest {
    /// The table wants to pay
    Bill,
    /// The table needs a waiter
    Help,
}

/// Classify an order. `None` means a real food order.
pub fn classify(order: &Order) -> Option<SystemRequest> {
    if order.items.iter().any(|l| l.item_id == BILL_REQUEST_ITEM) {
        Some(SystemRequest::Bill)
    } else if order.items.iter().any(|l| l.item_id == HELP_REQUEST_ITEM) {
        Some(SystemRequest::Help)
    } else {
        None
    }
}

pub fn is_system_order(order: &Order) -> bool {
    classify(order).is_some()
}

/// Assistance message of a help request; `None` for any other order.
pub fn help_message(order: &Order) -> Option<String> {
    let line = order.items.iter().find(|l| l.item_id == HELP_REQUEST_ITEM)?;
    let message = line
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_HELP_MESSAGE);
    Some(message.to_string())
}

/// A table's consolidated tab at bill time
///
/// Recomputed on demand from the current pending set, never persisted, so
/// it always reflects what the table actually owes when the bill prints.
#[derive(Debug, Clone, Serialize)]
pub struct BillConsolidation {
    pub table_label: String,
    /// Concatenated lines of the table's pending food orders
    pub items: Vec<OrderLine>,
    /// Σ total over those orders
    pub total: f64,
}

/// Gather all pending, non-system orders for the table and combine them.
///
/// The bill request itself carries no items; it is only the trigger to
/// consolidate the table's running tab. Synthetic sentinel lines are
/// excluded from the combined item list defensively.
pub fn consolidate_bill(pending: &[Order], table_label: &str) -> BillConsolidation {
    let mut items = Vec::new();
    let mut total = 0.0;

    let mut matching: Vec<&Order> = pending
        .iter()
        .filter(|o| o.table_label == table_label && o.is_pending() && !is_system_order(o))
        .collect();
    // concat in submission order
    matching.sort_by_key(|o| o.created_at);

    for order in matching {
        total += order.total;
        items.extend(
            order
                .items
                .iter()
                .filter(|l| l.item_id != BILL_REQUEST_ITEM && l.item_id != HELP_REQUEST_ITEM)
                .cloned(),
        );
    }

    BillConsolidation {
        table_label: table_label.to_string(),
        items,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::OrderLine;

    fn food_order(table: &str, total: f64) -> Order {
        Order::new(
            "t1",
            table,
            vec![OrderLine::new("item-1", "Tortilla", total, 1)],
            total,
        )
    }

    fn bill_request(table: &str) -> Order {
        Order::new(
            "t1",
            table,
            vec![OrderLine::new(BILL_REQUEST_ITEM, "Cuenta", 0.0, 1)],
            0.0,
        )
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&food_order("4", 9.0)), None);
        assert_eq!(classify(&bill_request("4")), Some(SystemRequest::Bill));

        let mut help = Order::new(
            "t1",
            "7",
            vec![OrderLine::new(HELP_REQUEST_ITEM, "Asistencia", 0.0, 1)],
            0.0,
        );
        assert_eq!(classify(&help), Some(SystemRequest::Help));
        help.items[0].notes = Some("need napkins".to_string());
        assert_eq!(help_message(&help).as_deref(), Some("need napkins"));
    }

    #[test]
    fn test_help_message_defaults_when_blank() {
        let mut help = Order::new(
            "t1",
            "7",
            vec![OrderLine::new(HELP_REQUEST_ITEM, "Asistencia", 0.0, 1)],
            0.0,
        );
        assert_eq!(help_message(&help).as_deref(), Some(DEFAULT_HELP_MESSAGE));
        help.items[0].notes = Some("   ".to_string());
        assert_eq!(help_message(&help).as_deref(), Some(DEFAULT_HELP_MESSAGE));
    }

    #[test]
    fn test_help_message_none_for_food_orders() {
        assert!(help_message(&food_order("4", 9.0)).is_none());
    }

    #[test]
    fn test_consolidation_sums_table_tab() {
        let pending = vec![
            food_order("7", 12.5),
            food_order("7", 8.0),
            food_order("4", 100.0), // other table
            bill_request("7"),      // system order excluded
        ];

        let bill = consolidate_bill(&pending, "7");
        assert_eq!(bill.total, 20.5);
        assert_eq!(bill.items.len(), 2);
        assert!(bill.items.iter().all(|l| l.item_id != BILL_REQUEST_ITEM));
    }

    #[test]
    fn test_consolidation_ignores_terminal_orders() {
        let mut completed = food_order("7", 50.0);
        completed.status = shared::order::OrderStatus::Completed;
        let pending = vec![completed, food_order("7", 8.0)];

        let bill = consolidate_bill(&pending, "7");
        assert_eq!(bill.total, 8.0);
    }

    #[test]
    fn test_consolidation_empty_table() {
        let bill = consolidate_bill(&[], "9");
        assert_eq!(bill.total, 0.0);
        assert!(bill.items.is_empty());
    }
}
