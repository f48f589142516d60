//! Order line items, option selections and prepared marks

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use validator::Validate;

/// One line of an order
///
/// Lines are recorded exactly as submitted; `station_id` binds the line to
/// the kitchen station that prepares it. A line without a station is only
/// visible on the main dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Menu item ID, or a reserved sentinel for system requests
    pub item_id: String,
    /// Item name snapshot
    pub name: String,
    /// Unit price. Transported as a decimal string; parse failures degrade
    /// to 0 rather than rejecting the order.
    #[serde(deserialize_with = "de_lenient_price")]
    pub price: f64,
    /// Quantity (positive)
    pub quantity: i32,
    /// Free-text note; carries the message body for help requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Station this line routes to (absent = unrouted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<String>,
    /// Selected option groups; price modifiers sum into the unit price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_options: Option<Vec<ItemOption>>,
}

impl OrderLine {
    /// Create a plain line with no note, station or options.
    pub fn new(item_id: impl Into<String>, name: impl Into<String>, price: f64, quantity: i32) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            price,
            quantity,
            notes: None,
            station_id: None,
            selected_options: None,
        }
    }

    /// Bind this line to a station.
    pub fn with_station(mut self, station_id: impl Into<String>) -> Self {
        self.station_id = Some(station_id.into());
        self
    }

    /// Effective unit price: base price plus the sum of option modifiers.
    pub fn effective_unit_price(&self) -> f64 {
        let modifiers: f64 = self
            .selected_options
            .iter()
            .flatten()
            .filter_map(|o| o.price_modifier)
            .sum();
        self.price + modifiers
    }

    /// Line total (effective unit price × quantity).
    pub fn line_total(&self) -> f64 {
        self.effective_unit_price() * self.quantity as f64
    }
}

/// Option selection on a line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemOption {
    /// Option group name ("Punto de la carne")
    pub group: String,
    /// Chosen option ("Poco hecha")
    pub option: String,
    /// Price delta added to the line's unit price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_modifier: Option<f64>,
}

/// Per-(item, station) preparation flag
///
/// An item mis-tagged at two stations tracks preparation independently per
/// station. Marks are only meaningful while the order is pending; once the
/// order is terminal they are frozen and cosmetic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreparedMark {
    pub item_id: String,
    pub station_id: String,
    pub completed_at: i64,
}

impl PreparedMark {
    pub fn new(item_id: impl Into<String>, station_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            station_id: station_id.into(),
            completed_at: crate::util::now_millis(),
        }
    }

    /// Compound-key match on `(item_id, station_id)`.
    pub fn matches(&self, item_id: &str, station_id: &str) -> bool {
        self.item_id == item_id && self.station_id == station_id
    }
}

/// Order creation input as submitted by the ordering client
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderDraft {
    /// Numeric table, the takeout sentinel, or "S/N"
    pub table_label: String,
    #[validate(length(min = 1, message = "order must contain at least one item"))]
    pub items: Vec<OrderLine>,
    #[validate(range(min = 0.0, message = "order total cannot be negative"))]
    pub total: f64,
}

impl OrderDraft {
    pub fn new(table_label: impl Into<String>, items: Vec<OrderLine>, total: f64) -> Self {
        Self {
            table_label: table_label.into(),
            items,
            total,
        }
    }
}

/// Parse a transport price string defensively.
///
/// Clients send prices as decimal strings ("10.00"). A malformed value
/// degrades to 0 instead of failing the whole order.
pub fn parse_price(raw: &str) -> f64 {
    match Decimal::from_str(raw.trim()) {
        Ok(d) => d.to_f64().unwrap_or(0.0),
        Err(_) => {
            tracing::warn!(raw, "Unparseable price in order payload, defaulting to 0");
            0.0
        }
    }
}

/// Accept a price as either a JSON number or a decimal string.
fn de_lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    Ok(match RawPrice::deserialize(deserializer) {
        Ok(RawPrice::Number(n)) if n.is_finite() => n,
        Ok(RawPrice::Number(_)) => 0.0,
        Ok(RawPrice::Text(s)) => parse_price(&s),
        Err(_) => 0.0,
    })
}
