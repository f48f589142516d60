//! Main dashboard feed
//!
//! The dashboard sees the whole tenant: every pending order including
//! system requests, plus the completed-today running total. Same
//! reconciliation and idempotency rules as the station feeds.

use crate::notify::NotificationSink;
use crate::orders::classifier::{self, SystemRequest};
use crate::orders::routing::{self, AGE_REFRESH_INTERVAL, AgeBand};
use crate::orders::store::OrderStore;
use crate::utils::AppResult;
use parking_lot::RwLock;
use serde::Serialize;
use shared::feed::{FeedEvent, FeedEventKind};
use shared::order::{Order, OrderStatus};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// One dashboard card
#[derive(Debug, Clone, Serialize)]
pub struct DashboardEntry {
    pub order: Order,
    /// Bill/help classification; `None` for food orders
    pub system: Option<SystemRequest>,
    /// Help-request message (default text substituted for blank notes)
    pub help_message: Option<String>,
    pub band: AgeBand,
}

struct DashboardState {
    pending: HashMap<String, Order>,
    /// Orders already counted into `completed_today`; duplicate update
    /// events for the same completion must not double-count
    counted: HashSet<String>,
    completed_today: f64,
}

/// Tenant-wide dashboard consumer
pub struct DashboardFeed {
    tenant_id: String,
    store: Arc<OrderStore>,
    sink: Arc<dyn NotificationSink>,
    muted: AtomicBool,
    clock: AtomicI64,
    state: RwLock<DashboardState>,
}

impl DashboardFeed {
    pub fn new(
        tenant_id: impl Into<String>,
        store: Arc<OrderStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Arc<Self> {
        Arc::new(Self {
            tenant_id: tenant_id.into(),
            store,
            sink,
            muted: AtomicBool::new(false),
            clock: AtomicI64::new(shared::util::now_millis()),
            state: RwLock::new(DashboardState {
                pending: HashMap::new(),
                counted: HashSet::new(),
                completed_today: 0.0,
            }),
        })
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    /// 运行消费循环（阻塞直到关闭或通道关闭）
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) {
        let mut rx = self.store.bus().subscribe(&self.tenant_id);
        if let Err(e) = self.reconcile().await {
            tracing::error!(tenant_id = %self.tenant_id, error = %e, "Initial dashboard reconcile failed");
        }
        tracing::info!(tenant_id = %self.tenant_id, "Dashboard feed started");

        let mut age_timer = tokio::time::interval(AGE_REFRESH_INTERVAL);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!(tenant_id = %self.tenant_id, "Dashboard feed received shutdown signal");
                    break;
                }
                _ = age_timer.tick() => {
                    self.clock.store(shared::util::now_millis(), Ordering::Relaxed);
                }
                event = rx.recv() => {
                    match event {
                        Ok(event) => self.apply_event(&event),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(tenant_id = %self.tenant_id, skipped, "Dashboard feed lagged, reconciling");
                            if let Err(e) = self.reconcile().await {
                                tracing::error!(tenant_id = %self.tenant_id, error = %e, "Reconcile after lag failed");
                            }
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::info!(tenant_id = %self.tenant_id, "Feed channel closed, dashboard feed stopping");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Apply one feed event. Idempotent against at-least-once delivery.
    pub fn apply_event(&self, event: &FeedEvent) {
        let order = &event.order;
        let newly_seen;
        {
            let mut state = self.state.write();
            if order.is_pending() {
                newly_seen = state.pending.insert(order.id.clone(), order.clone()).is_none();
            } else {
                state.pending.remove(&order.id);
                newly_seen = false;
                if order.status == OrderStatus::Completed && state.counted.insert(order.id.clone())
                {
                    state.completed_today += order.total;
                }
            }
        }

        if event.kind == FeedEventKind::OrderInserted && newly_seen && !self.is_muted() {
            self.sink.order_alert();
        }
    }

    /// Fetch pending orders and the completed-today total from the store.
    pub async fn reconcile(&self) -> AppResult<()> {
        let orders = self.store.list_pending(&self.tenant_id).await?;
        let completed_today = self.store.completed_total_today(&self.tenant_id).await?;

        let mut state = self.state.write();
        state.pending = orders.into_iter().map(|o| (o.id.clone(), o)).collect();
        // total is authoritative from the store; `counted` is kept so a
        // duplicate completion event arriving after reconcile stays deduped
        state.completed_today = completed_today;
        drop(state);

        self.clock
            .store(shared::util::now_millis(), Ordering::Relaxed);
        Ok(())
    }

    /// Current pending cards, newest first.
    pub fn pending_entries(&self) -> Vec<DashboardEntry> {
        let now = self.clock.load(Ordering::Relaxed);
        let state = self.state.read();

        let mut entries: Vec<DashboardEntry> = state
            .pending
            .values()
            .map(|order| DashboardEntry {
                system: classifier::classify(order),
                help_message: classifier::help_message(order),
                band: routing::age_band(order.created_at, now),
                order: order.clone(),
            })
            .collect();

        entries.sort_by(|a, b| b.order.created_at.cmp(&a.order.created_at));
        entries
    }

    /// Sum of completed-order totals observed today.
    pub fn completed_today(&self) -> f64 {
        self.state.read().completed_today
    }
}
