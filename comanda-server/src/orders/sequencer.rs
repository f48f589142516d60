//! Takeout pickup-number sequencer
//!
//! Assigns a small, human-speakable number (1-99, cyclically reused) to
//! "to go" orders. The number is derived by scanning the tenant's existing
//! orders for the highest prior takeout number; there is no dedicated
//! counter row and no reservation, so two concurrent takeout submissions
//! may compute the same number. A collision only duplicates a pickup
//! number on screen, it is not a data-integrity fault.

use shared::order::{Order, TAKEOUT_PREFIX};

/// Highest pickup number before wrapping back to 1
pub const MAX_TAKEOUT_SEQUENCE: u32 = 99;

/// Next pickup number given the tenant's existing orders.
///
/// `next = (max_seen mod 99) + 1`; with no prior takeout orders the first
/// number is 1, and after 99 the sequence wraps to 1.
pub fn next_sequence<'a>(orders: impl IntoIterator<Item = &'a Order>) -> u32 {
    let max_seen = orders
        .into_iter()
        .filter_map(|o| o.takeout_sequence())
        .max()
        .unwrap_or(0);
    (max_seen % MAX_TAKEOUT_SEQUENCE) + 1
}

/// Table label for a sequenced takeout order (`LLEVAR-<n>`).
pub fn takeout_label(sequence: u32) -> String {
    format!("{}{}", TAKEOUT_PREFIX, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn takeout(seq: u32) -> Order {
        Order::new("t1", takeout_label(seq), vec![], 0.0)
    }

    #[test]
    fn test_first_takeout_gets_one() {
        assert_eq!(next_sequence([].iter()), 1);
    }

    #[test]
    fn test_next_follows_highest_seen() {
        let orders = vec![takeout(1), takeout(2), takeout(5)];
        assert_eq!(next_sequence(orders.iter()), 6);
    }

    #[test]
    fn test_wraps_after_99() {
        let orders = vec![takeout(99)];
        assert_eq!(next_sequence(orders.iter()), 1);
    }

    #[test]
    fn test_dine_in_orders_ignored() {
        let orders = vec![Order::new("t1", "12", vec![], 0.0), takeout(3)];
        assert_eq!(next_sequence(orders.iter()), 4);
    }

    #[test]
    fn test_label_format() {
        assert_eq!(takeout_label(17), "LLEVAR-17");
    }
}
