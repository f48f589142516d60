//! Print queue
//!
//! Serializes ticket rendering and dispatch so overlapping print requests
//! never race on the shared printer.
//!
//! # 模块结构
//!
//! - [`types`] - 打印任务与票据配置
//! - [`service`] - 队列服务 (入队接口)
//! - [`worker`] - FIFO 排空工作者
//! - [`renderer`] - ESC/POS 渲染与网络分发实现

pub mod renderer;
pub mod service;
pub mod types;
pub mod worker;

pub use renderer::{EscPosTicketRenderer, LogDispatcher, NetworkDispatcher};
pub use service::{PrintQueueConfig, PrintQueueService};
pub use types::{PrintDispatcher, PrintJob, TicketConfig, TicketRenderer};
pub use worker::PrintWorker;
