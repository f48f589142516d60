//! Station routing and elapsed-time banding
//!
//! Projects a tenant-wide order down to "what this station must prepare".
//! All functions here are pure; mutation of prepared marks goes through
//! [`OrderStore::toggle_item_prepared`](super::store::OrderStore).

use serde::Serialize;
use shared::order::{Order, OrderLine};
use std::time::Duration;

/// Age below which a ticket is considered on time
pub const WARNING_AGE: Duration = Duration::from_secs(5 * 60);

/// Age at which a ticket becomes critical
pub const CRITICAL_AGE: Duration = Duration::from_secs(10 * 60);

/// How often consumers refresh age bands.
///
/// Bands are recomputed on this coarse timer rather than per render, so a
/// kiosk display that stays open for a whole shift does not burn cycles
/// re-deriving the same value.
pub const AGE_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Elapsed-time band for SLA coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgeBand {
    /// < 5 minutes
    Nominal,
    /// 5-10 minutes
    Warning,
    /// >= 10 minutes
    Critical,
}

/// Band for an order created at `created_at`, both in Unix millis.
pub fn age_band(created_at: i64, now: i64) -> AgeBand {
    let age_ms = (now - created_at).max(0) as u128;
    if age_ms >= CRITICAL_AGE.as_millis() {
        AgeBand::Critical
    } else if age_ms >= WARNING_AGE.as_millis() {
        AgeBand::Warning
    } else {
        AgeBand::Nominal
    }
}

/// Lines of `order` routed to `station_id`.
///
/// An order with no matching lines is invisible to that station; callers
/// must not render an empty card for it.
pub fn items_for_station<'a>(order: &'a Order, station_id: &str) -> Vec<&'a OrderLine> {
    order
        .items
        .iter()
        .filter(|line| line.station_id.as_deref() == Some(station_id))
        .collect()
}

/// Whether a prepared mark exists for the exact `(item_id, station_id)` pair.
pub fn is_prepared(order: &Order, item_id: &str, station_id: &str) -> bool {
    order.is_prepared(item_id, station_id)
}

/// Whether every line routed to the station has a prepared mark.
///
/// Display-only ("LISTO" badge): carries no transition obligation, a human
/// still completes the order. Returns false when no lines route to the
/// station, so a caller that skips the visibility filter cannot show a
/// vacuous badge.
pub fn all_items_prepared_for_station(order: &Order, station_id: &str) -> bool {
    let lines = items_for_station(order, station_id);
    !lines.is_empty()
        && lines
            .iter()
            .all(|line| order.is_prepared(&line.item_id, station_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{OrderLine, PreparedMark};

    fn order_with_stations() -> Order {
        Order::new(
            "t1",
            "4",
            vec![
                OrderLine::new("a", "Tortilla", 4.5, 1).with_station("plancha"),
                OrderLine::new("b", "Ensalada", 6.0, 1).with_station("fria"),
                OrderLine::new("c", "Caña", 2.0, 2), // unrouted
            ],
            14.5,
        )
    }

    #[test]
    fn test_items_for_station_filters_exactly() {
        let order = order_with_stations();
        let plancha = items_for_station(&order, "plancha");
        assert_eq!(plancha.len(), 1);
        assert_eq!(plancha[0].item_id, "a");

        assert!(items_for_station(&order, "postres").is_empty());
    }

    #[test]
    fn test_unrouted_lines_match_no_station() {
        let order = order_with_stations();
        for station in ["plancha", "fria"] {
            assert!(
                items_for_station(&order, station)
                    .iter()
                    .all(|l| l.item_id != "c")
            );
        }
    }

    #[test]
    fn test_all_items_prepared() {
        let mut order = order_with_stations();
        assert!(!all_items_prepared_for_station(&order, "plancha"));

        order.prepared_items.push(PreparedMark::new("a", "plancha"));
        assert!(all_items_prepared_for_station(&order, "plancha"));
        // other station unaffected
        assert!(!all_items_prepared_for_station(&order, "fria"));
    }

    #[test]
    fn test_no_routed_lines_is_not_ready() {
        let order = order_with_stations();
        assert!(!all_items_prepared_for_station(&order, "postres"));
    }

    #[test]
    fn test_prepared_mark_is_per_station() {
        let mut order = order_with_stations();
        order.prepared_items.push(PreparedMark::new("a", "plancha"));
        assert!(is_prepared(&order, "a", "plancha"));
        assert!(!is_prepared(&order, "a", "fria"));
    }

    #[test]
    fn test_age_band_thresholds() {
        let created = 0;
        assert_eq!(age_band(created, 4 * 60 * 1000), AgeBand::Nominal);
        assert_eq!(age_band(created, 5 * 60 * 1000), AgeBand::Warning);
        assert_eq!(age_band(created, 9 * 60 * 1000 + 59_999), AgeBand::Warning);
        assert_eq!(age_band(created, 10 * 60 * 1000), AgeBand::Critical);
        // clock skew: order "from the future" stays nominal
        assert_eq!(age_band(60_000, 0), AgeBand::Nominal);
    }
}
