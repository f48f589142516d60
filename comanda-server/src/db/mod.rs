//! 持久化网关 - 嵌入式 redb 存储
//!
//! # 模块结构
//!
//! - [`Storage`] - 订单 / 工位 / 菜单项的多租户存储
//! - [`RetryPolicy`] / [`with_retry`] - 瞬时错误的指数退避重试

pub mod retry;
pub mod storage;

pub use retry::{RetryPolicy, with_retry};
pub use storage::{Storage, StorageError, StorageResult};
