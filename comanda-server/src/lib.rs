//! Comanda Server - 餐厅扫码点单与厨房调度引擎
//!
//! # 架构概述
//!
//! 本模块是订单生命周期与厨房路由引擎的主入口，提供以下核心功能：
//!
//! - **订单仓库** (`orders`): 订单创建、状态机、外带取号、系统请求分类
//! - **实时推送** (`message`): 按租户隔离的广播通道
//! - **消费端** (`kds`): 仪表盘与 KDS 工位视图投影
//! - **打印队列** (`printing`): FIFO 单据打印，单任务失败隔离
//! - **数据库** (`db`): 嵌入式 redb 存储网关
//!
//! # 模块结构
//!
//! ```text
//! comanda-server/src/
//! ├── core/          # 配置
//! ├── utils/         # 错误类型、日志
//! ├── db/            # 持久化网关 (redb)
//! ├── orders/        # 订单仓库、路由、取号、分类
//! ├── stations/      # 工位注册表
//! ├── message/       # 实时推送总线
//! ├── kds/           # 仪表盘 / KDS 消费端
//! ├── notify/        # 新订单提示音接口
//! └── printing/      # 打印队列
//! ```

pub mod core;
pub mod db;
pub mod kds;
pub mod message;
pub mod notify;
pub mod orders;
pub mod printing;
pub mod stations;
pub mod utils;

// Re-export 公共类型
pub use self::core::Config;
pub use db::{RetryPolicy, Storage, StorageError};
pub use kds::{DashboardFeed, StationFeed};
pub use message::FeedBus;
pub use notify::{NotificationSink, SilentSink};
pub use orders::{BillConsolidation, OrderStore, SystemRequest};
pub use printing::{PrintJob, PrintQueueService, TicketConfig};
pub use stations::StationRegistry;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
