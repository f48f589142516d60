//! OrderStore - order creation, status transitions, prepared-state
//!
//! The store is the single writer of order status and prepared marks for a
//! given order. Concurrent staff writes (two terminals completing the same
//! order) resolve last-write-wins at the row level; duplicate completions
//! are benign no-ops, which is what the optimistic dashboards rely on.
//!
//! # Write flow
//!
//! ```text
//! create / complete / cancel / toggle
//!     ├─ 1. Validate (fail fast, no retry)
//!     ├─ 2. Persist via gateway (transient errors retried with backoff)
//!     └─ 3. Publish FeedEvent (insert before any update for that order)
//! ```

use crate::db::{RetryPolicy, Storage, with_retry};
use crate::message::FeedBus;
use crate::orders::{classifier, sequencer};
use crate::utils::{AppError, AppResult};
use shared::feed::FeedEvent;
use shared::order::{
    BILL_REQUEST_ITEM, HELP_REQUEST_ITEM, Order, OrderDraft, OrderLine, OrderStatus, PreparedMark,
    TAKEOUT_SENTINEL, UNKNOWN_TABLE,
};
use std::sync::Arc;
use validator::Validate;

/// Order store over the persistence gateway and the realtime feed
pub struct OrderStore {
    storage: Storage,
    bus: Arc<FeedBus>,
    retry: RetryPolicy,
}

impl OrderStore {
    pub fn new(storage: Storage, bus: Arc<FeedBus>, retry: RetryPolicy) -> Self {
        Self { storage, bus, retry }
    }

    /// Access the realtime feed bus (for consumer subscription).
    pub fn bus(&self) -> &Arc<FeedBus> {
        &self.bus
    }

    // ========== Creation ==========

    /// Create a new pending order from a client draft.
    ///
    /// Fails with a validation error on an empty cart or a negative total.
    /// A draft whose table label is the takeout sentinel gets a pickup
    /// number assigned (1-99, derived from existing orders; concurrent
    /// submissions may duplicate a number, which is cosmetic).
    pub async fn create_order(&self, tenant_id: &str, draft: OrderDraft) -> AppResult<Order> {
        draft.validate()?;

        let table_label = if draft.table_label.trim().is_empty() {
            UNKNOWN_TABLE.to_string()
        } else if draft.table_label == TAKEOUT_SENTINEL {
            let existing =
                with_retry(&self.retry, "list_orders", || self.storage.list_orders(tenant_id))
                    .await?;
            let sequence = sequencer::next_sequence(existing.iter());
            sequencer::takeout_label(sequence)
        } else {
            draft.table_label.clone()
        };

        let order = Order::new(tenant_id, table_label, draft.items, draft.total);

        with_retry(&self.retry, "insert_order", || {
            self.storage.insert_order(&order)
        })
        .await?;

        tracing::info!(
            order_id = %order.id,
            tenant_id,
            table_label = %order.table_label,
            total = order.total,
            items = order.items.len(),
            "Order created"
        );
        self.bus.publish(FeedEvent::inserted(order.clone()));
        Ok(order)
    }

    /// Create a bill request for a table.
    ///
    /// A synthetic zero-total order with a single sentinel line; it rides
    /// the same realtime and print pipes as food orders.
    pub async fn request_bill(&self, tenant_id: &str, table_label: &str) -> AppResult<Order> {
        let line = OrderLine::new(BILL_REQUEST_ITEM, "Cuenta", 0.0, 1);
        self.create_order(tenant_id, OrderDraft::new(table_label, vec![line], 0.0))
            .await
    }

    /// Create a help request for a table. `message` becomes the note shown
    /// to staff; a blank message falls back to the default text at display
    /// time.
    pub async fn request_help(
        &self,
        tenant_id: &str,
        table_label: &str,
        message: Option<String>,
    ) -> AppResult<Order> {
        let mut line = OrderLine::new(HELP_REQUEST_ITEM, "Asistencia", 0.0, 1);
        line.notes = message;
        self.create_order(tenant_id, OrderDraft::new(table_label, vec![line], 0.0))
            .await
    }

    // ========== Status Transitions ==========

    /// Mark an order completed. Calling on a terminal order is a benign
    /// no-op success: duplicate realtime events must not corrupt state.
    pub async fn complete_order(&self, tenant_id: &str, order_id: &str) -> AppResult<Order> {
        self.transition(tenant_id, order_id, OrderStatus::Completed)
            .await
    }

    /// Cancel an order. Same idempotency contract as [`complete_order`](Self::complete_order).
    pub async fn cancel_order(&self, tenant_id: &str, order_id: &str) -> AppResult<Order> {
        self.transition(tenant_id, order_id, OrderStatus::Cancelled)
            .await
    }

    async fn transition(
        &self,
        tenant_id: &str,
        order_id: &str,
        to: OrderStatus,
    ) -> AppResult<Order> {
        let mut order = self.load(tenant_id, order_id).await?;

        if order.is_terminal() {
            tracing::debug!(order_id, current = ?order.status, requested = ?to, "Transition on terminal order ignored");
            return Ok(order);
        }

        order.status = to;
        with_retry(&self.retry, "update_order", || {
            self.storage.update_order(&order)
        })
        .await?;

        tracing::info!(order_id, status = ?to, "Order transitioned");
        self.bus.publish(FeedEvent::updated(order.clone()));
        Ok(order)
    }

    // ========== Prepared Marks ==========

    /// Flip the prepared mark for `(item_id, station_id)`.
    ///
    /// Add if absent, remove if present; undo stays available while the
    /// order is pending. Never changes `status`. Once the order is
    /// terminal, prepared-state is frozen and the call is a no-op.
    pub async fn toggle_item_prepared(
        &self,
        tenant_id: &str,
        order_id: &str,
        item_id: &str,
        station_id: &str,
    ) -> AppResult<Order> {
        let mut order = self.load(tenant_id, order_id).await?;

        if !order.is_pending() {
            tracing::debug!(order_id, "Prepared toggle on terminal order ignored");
            return Ok(order);
        }

        match order
            .prepared_items
            .iter()
            .position(|m| m.matches(item_id, station_id))
        {
            Some(idx) => {
                order.prepared_items.remove(idx);
                tracing::debug!(order_id, item_id, station_id, "Prepared mark removed");
            }
            None => {
                order
                    .prepared_items
                    .push(PreparedMark::new(item_id, station_id));
                tracing::debug!(order_id, item_id, station_id, "Prepared mark added");
            }
        }

        with_retry(&self.retry, "update_order", || {
            self.storage.update_order(&order)
        })
        .await?;

        self.bus.publish(FeedEvent::updated(order.clone()));
        Ok(order)
    }

    // ========== Projections ==========

    /// Pending orders for a tenant, newest first. No side effects.
    pub async fn list_pending(&self, tenant_id: &str) -> AppResult<Vec<Order>> {
        Ok(
            with_retry(&self.retry, "list_pending", || {
                self.storage.list_pending(tenant_id)
            })
            .await?,
        )
    }

    /// Completed orders for a tenant, newest first. No side effects.
    pub async fn list_completed(&self, tenant_id: &str) -> AppResult<Vec<Order>> {
        Ok(with_retry(&self.retry, "list_completed", || {
            self.storage
                .list_orders_by_status(tenant_id, OrderStatus::Completed)
        })
        .await?)
    }

    /// Sum of completed-order totals for the current day.
    pub async fn completed_total_today(&self, tenant_id: &str) -> AppResult<f64> {
        let day_start = shared::util::day_start_millis(shared::util::now_millis());
        let completed = self.list_completed(tenant_id).await?;
        Ok(completed
            .iter()
            .filter(|o| o.created_at >= day_start)
            .map(|o| o.total)
            .sum())
    }

    /// Consolidate the running tab of a table for bill printing.
    ///
    /// Recomputed from the current pending set on every call, never
    /// persisted, so it reflects pending state at consolidation time.
    pub async fn consolidate_bill(
        &self,
        tenant_id: &str,
        table_label: &str,
    ) -> AppResult<classifier::BillConsolidation> {
        let pending = self.list_pending(tenant_id).await?;
        Ok(classifier::consolidate_bill(&pending, table_label))
    }

    async fn load(&self, tenant_id: &str, order_id: &str) -> AppResult<Order> {
        with_retry(&self.retry, "get_order", || {
            self.storage.get_order(tenant_id, order_id)
        })
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", order_id)))
    }
}
