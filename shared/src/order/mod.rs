//! Order domain model
//!
//! Orders are immutable snapshots of what the diner submitted: line items
//! keep the name/price/station binding they had at submission time, even if
//! the menu or the station list changes afterwards. Only `status` and
//! `prepared_items` mutate after creation.

mod record;
mod types;

pub use record::{Order, OrderStatus};
pub use types::{ItemOption, OrderDraft, OrderLine, PreparedMark, parse_price};

// ============================================================================
// Reserved identifiers
// ============================================================================
//
// These values are wire-level contract points shared with the ordering client
// and the staff dashboards. Renaming any of them breaks stored data and every
// consumer at once.

/// Sentinel `item_id` marking an order as a bill request.
pub const BILL_REQUEST_ITEM: &str = "bill-req";

/// Sentinel `item_id` marking an order as a help request.
pub const HELP_REQUEST_ITEM: &str = "help-req";

/// Table label submitted by the client for a to-go order, before the
/// sequencer assigns a pickup number.
pub const TAKEOUT_SENTINEL: &str = "LLEVAR";

/// Prefix of sequenced takeout table labels (`LLEVAR-1` .. `LLEVAR-99`).
pub const TAKEOUT_PREFIX: &str = "LLEVAR-";

/// Table label used when the table is unknown.
pub const UNKNOWN_TABLE: &str = "S/N";
