//! KDS station feed
//!
//! One `StationFeed` per open KDS terminal. It projects the tenant's
//! pending orders through the routing engine so the terminal only sees
//! lines bound to its station, and keeps per-item prepared state visible.
//!
//! # 对账
//!
//! 通道本身不回放历史：挂载时先订阅、再拉取当前 pending 列表，断线重连
//! (Lagged) 后重新对账。事件按订单 ID 整体替换，重复投递幂等。

use crate::notify::NotificationSink;
use crate::orders::classifier;
use crate::orders::routing::{self, AGE_REFRESH_INTERVAL, AgeBand};
use crate::orders::store::OrderStore;
use crate::utils::AppResult;
use parking_lot::RwLock;
use serde::Serialize;
use shared::feed::{FeedEvent, FeedEventKind};
use shared::order::{Order, OrderLine};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// What one station renders for one order
#[derive(Debug, Clone, Serialize)]
pub struct StationTicket {
    pub order: Order,
    /// Lines routed to this station
    pub lines: Vec<OrderLine>,
    /// Every routed line has a prepared mark ("LISTO" badge, display only)
    pub ready: bool,
    /// Elapsed-time band at the last coarse refresh
    pub band: AgeBand,
}

/// Per-station KDS consumer
pub struct StationFeed {
    tenant_id: String,
    station_id: String,
    store: Arc<OrderStore>,
    sink: Arc<dyn NotificationSink>,
    /// Operator mute: skips the chime, never affects delivery
    muted: AtomicBool,
    /// Coarse clock driving age bands (refreshed every ~30 s, not per render)
    clock: AtomicI64,
    /// Pending orders with at least one line routed to this station
    pending: RwLock<HashMap<String, Order>>,
}

impl StationFeed {
    pub fn new(
        tenant_id: impl Into<String>,
        station_id: impl Into<String>,
        store: Arc<OrderStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Arc<Self> {
        Arc::new(Self {
            tenant_id: tenant_id.into(),
            station_id: station_id.into(),
            store,
            sink,
            muted: AtomicBool::new(false),
            clock: AtomicI64::new(shared::util::now_millis()),
            pending: RwLock::new(HashMap::new()),
        })
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    /// 运行消费循环（阻塞直到关闭或通道关闭）
    ///
    /// 先订阅、再对账，避免断档窗口丢事件。
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) {
        let mut rx = self.store.bus().subscribe(&self.tenant_id);
        if let Err(e) = self.reconcile().await {
            tracing::error!(station_id = %self.station_id, error = %e, "Initial reconcile failed");
        }
        tracing::info!(tenant_id = %self.tenant_id, station_id = %self.station_id, "Station feed started");

        let mut age_timer = tokio::time::interval(AGE_REFRESH_INTERVAL);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!(station_id = %self.station_id, "Station feed received shutdown signal");
                    break;
                }
                _ = age_timer.tick() => {
                    self.clock.store(shared::util::now_millis(), Ordering::Relaxed);
                }
                event = rx.recv() => {
                    match event {
                        Ok(event) => self.apply_event(&event),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(station_id = %self.station_id, skipped, "Station feed lagged, reconciling");
                            if let Err(e) = self.reconcile().await {
                                tracing::error!(station_id = %self.station_id, error = %e, "Reconcile after lag failed");
                            }
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::info!(station_id = %self.station_id, "Feed channel closed, station feed stopping");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Apply one feed event to the local projection.
    ///
    /// Idempotent: re-applying an identical event is a no-op, and the
    /// chime only fires for orders this terminal has not seen yet.
    pub fn apply_event(&self, event: &FeedEvent) {
        let order = &event.order;

        // system requests route to the bill printer role, never a food station
        if classifier::is_system_order(order) {
            return;
        }

        let visible =
            order.is_pending() && !routing::items_for_station(order, &self.station_id).is_empty();

        let newly_seen;
        {
            let mut pending = self.pending.write();
            if visible {
                newly_seen = pending.insert(order.id.clone(), order.clone()).is_none();
            } else {
                pending.remove(&order.id);
                newly_seen = false;
            }
        }

        if event.kind == FeedEventKind::OrderInserted && newly_seen && !self.is_muted() {
            self.sink.order_alert();
        }
    }

    /// Fetch the current pending set from the store and replace local state.
    pub async fn reconcile(&self) -> AppResult<()> {
        let orders = self.store.list_pending(&self.tenant_id).await?;
        let relevant: HashMap<String, Order> = orders
            .into_iter()
            .filter(|o| {
                !classifier::is_system_order(o)
                    && !routing::items_for_station(o, &self.station_id).is_empty()
            })
            .map(|o| (o.id.clone(), o))
            .collect();

        self.clock
            .store(shared::util::now_millis(), Ordering::Relaxed);
        *self.pending.write() = relevant;
        Ok(())
    }

    /// Current tickets for this station, oldest first.
    pub fn tickets(&self) -> Vec<StationTicket> {
        let now = self.clock.load(Ordering::Relaxed);
        let pending = self.pending.read();

        let mut tickets: Vec<StationTicket> = pending
            .values()
            .map(|order| StationTicket {
                lines: routing::items_for_station(order, &self.station_id)
                    .into_iter()
                    .cloned()
                    .collect(),
                ready: routing::all_items_prepared_for_station(order, &self.station_id),
                band: routing::age_band(order.created_at, now),
                order: order.clone(),
            })
            .collect();

        tickets.sort_by_key(|t| t.order.created_at);
        tickets
    }
}
