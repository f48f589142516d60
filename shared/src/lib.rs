//! Shared domain types for the comanda workspace
//!
//! 订单、厨房工位和实时事件的公共模型，供 comanda-server 和各消费端
//! (仪表盘 / KDS 终端) 共用。
//!
//! # 模块结构
//!
//! - [`order`] - 订单模型：订单行、备餐标记、状态机、保留哨兵 ID
//! - [`models`] - 工位与菜单项
//! - [`feed`] - 实时推送事件 (order-insert / order-update)
//! - [`util`] - 时间工具

pub mod feed;
pub mod models;
pub mod order;
pub mod util;

// Re-export common types
pub use feed::{FeedEvent, FeedEventKind};
pub use models::{MenuItem, Station};
pub use order::{ItemOption, Order, OrderDraft, OrderLine, OrderStatus, PreparedMark};
