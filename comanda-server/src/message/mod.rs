//! 实时推送 - 按租户隔离的订单事件广播

pub mod bus;

pub use bus::{FeedBus, FeedBusConfig};
