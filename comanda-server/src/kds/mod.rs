//! Feed consumers - dashboard and per-station KDS projections

pub mod dashboard;
pub mod feed;

pub use dashboard::{DashboardEntry, DashboardFeed};
pub use feed::{StationFeed, StationTicket};
