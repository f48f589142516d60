//! 推送总线核心实现
//!
//! # 架构
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                       FeedBus                            │
//! │  ┌───────────────────────────────────────────────────┐  │
//! │  │  tenant_id -> broadcast::Sender<FeedEvent>        │  │
//! │  └───────────────────────────────────────────────────┘  │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//!        ┌─────────────────┼─────────────────┐
//!        ▼                 ▼                 ▼
//!   Dashboard        KDS (plancha)      KDS (fría)
//! ```
//!
//! # 投递保证
//!
//! - 租户硬隔离：每个租户一条独立通道，订阅方永远收不到其他租户的事件
//! - 单订单因果序：仓库是唯一发布方，同一订单的 insert 先于任何 update
//! - 无回放：通道不缓存历史，订阅方挂载时必须主动拉取当前 pending 列表
//! - at-least-once：消费端按订单 ID 整体替换，重复投递天然幂等

use dashmap::DashMap;
use shared::feed::FeedEvent;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Configuration for the feed bus
#[derive(Debug, Clone)]
pub struct FeedBusConfig {
    /// Capacity of each tenant's broadcast channel (default: 1024)
    pub channel_capacity: usize,
}

impl Default for FeedBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

/// 推送总线 - 负责按租户路由订单事件
#[derive(Debug)]
pub struct FeedBus {
    /// 每租户一条广播通道 (tenant_id -> sender)
    channels: DashMap<String, broadcast::Sender<FeedEvent>>,
    config: FeedBusConfig,
    /// 关闭信号令牌
    shutdown_token: CancellationToken,
}

impl FeedBus {
    /// 创建默认配置的推送总线
    pub fn new() -> Self {
        Self::from_config(FeedBusConfig::default())
    }

    /// 从配置创建推送总线
    pub fn from_config(config: FeedBusConfig) -> Self {
        Self {
            channels: DashMap::new(),
            config,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// 创建指定容量的推送总线
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_config(FeedBusConfig {
            channel_capacity: capacity,
        })
    }

    fn sender(&self, tenant_id: &str) -> broadcast::Sender<FeedEvent> {
        self.channels
            .entry(tenant_id.to_string())
            .or_insert_with(|| broadcast::channel(self.config.channel_capacity).0)
            .clone()
    }

    /// 订阅某租户的订单事件
    ///
    /// 通道不回放历史事件：订阅后必须单独拉取当前 pending 列表完成对账。
    pub fn subscribe(&self, tenant_id: &str) -> broadcast::Receiver<FeedEvent> {
        self.sender(tenant_id).subscribe()
    }

    /// 发布事件到其所属租户的通道
    ///
    /// 没有订阅方时事件直接丢弃（正常情况：店内无人打开看板）。
    pub fn publish(&self, event: FeedEvent) {
        let tx = self.sender(&event.tenant_id);
        match tx.send(event) {
            Ok(receivers) => {
                tracing::trace!(receivers, "Feed event delivered");
            }
            Err(e) => {
                tracing::debug!(tenant_id = %e.0.tenant_id, "Feed event dropped: no subscribers");
            }
        }
    }

    /// 某租户当前的订阅方数量
    pub fn subscriber_count(&self, tenant_id: &str) -> usize {
        self.channels
            .get(tenant_id)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// 获取关闭令牌 (消费端监听此令牌退出)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 优雅关闭：通知所有消费端退出
    pub fn shutdown(&self) {
        tracing::info!("Shutting down feed bus");
        self.shutdown_token.cancel();
    }
}

impl Default for FeedBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::feed::FeedEventKind;
    use shared::order::Order;

    fn event_for(tenant: &str) -> FeedEvent {
        FeedEvent::inserted(Order::new(tenant, "4", vec![], 0.0))
    }

    #[tokio::test]
    async fn test_tenant_isolation() {
        let bus = FeedBus::new();
        let mut rx_t1 = bus.subscribe("t1");
        let mut rx_t2 = bus.subscribe("t2");

        bus.publish(event_for("t1"));

        let received = rx_t1.recv().await.unwrap();
        assert_eq!(received.tenant_id, "t1");
        assert!(rx_t2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_insert_observed_before_update() {
        let bus = FeedBus::new();
        let mut rx = bus.subscribe("t1");

        let order = Order::new("t1", "4", vec![], 0.0);
        bus.publish(FeedEvent::inserted(order.clone()));
        bus.publish(FeedEvent::updated(order));

        assert_eq!(rx.recv().await.unwrap().kind, FeedEventKind::OrderInserted);
        assert_eq!(rx.recv().await.unwrap().kind, FeedEventKind::OrderUpdated);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_silent() {
        let bus = FeedBus::new();
        bus.publish(event_for("empty-tenant"));
        assert_eq!(bus.subscriber_count("empty-tenant"), 0);
    }

    #[tokio::test]
    async fn test_late_subscriber_gets_no_backfill() {
        let bus = FeedBus::new();
        bus.publish(event_for("t1"));

        let mut rx = bus.subscribe("t1");
        assert!(rx.try_recv().is_err());
    }
}
