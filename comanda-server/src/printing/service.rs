//! Print queue service
//!
//! An explicit object with its own lifecycle: constructed once per process
//! and handed to consumers, never module-level state, so tests get
//! isolated queues.

use super::types::{PrintDispatcher, PrintJob, TicketRenderer};
use super::worker::PrintWorker;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Queue configuration
#[derive(Debug, Clone)]
pub struct PrintQueueConfig {
    /// Queued jobs before enqueue starts dropping (best effort)
    pub queue_capacity: usize,
    /// Pause between job dispatches so native print flows never overlap
    pub inter_job_delay: Duration,
}

impl Default for PrintQueueConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            inter_job_delay: Duration::from_millis(300),
        }
    }
}

/// FIFO print queue
///
/// Jobs drain strictly in submission order, one in flight at a time. Bulk
/// printing is just N sequential [`enqueue`](Self::enqueue) calls with no
/// atomicity across the batch.
pub struct PrintQueueService {
    job_tx: mpsc::Sender<PrintJob>,
}

impl PrintQueueService {
    /// Start the queue and its draining worker.
    pub fn start(
        renderer: Arc<dyn TicketRenderer>,
        dispatcher: Arc<dyn PrintDispatcher>,
        config: PrintQueueConfig,
        shutdown: CancellationToken,
    ) -> Self {
        let (job_tx, job_rx) = mpsc::channel(config.queue_capacity);
        let worker = PrintWorker::new(renderer, dispatcher, config.inter_job_delay);
        tokio::spawn(worker.run(job_rx, shutdown));
        Self { job_tx }
    }

    /// Append a job to the tail of the queue.
    ///
    /// Best effort: a full or closed queue drops the job with a log line
    /// instead of blocking the caller. Returns whether the job was queued.
    pub fn enqueue(&self, job: PrintJob) -> bool {
        match self.job_tx.try_send(job) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(job)) => {
                tracing::warn!(order_id = %job.order.id, "Print queue full, job dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(job)) => {
                tracing::debug!(order_id = %job.order.id, "Print queue closed, job dropped");
                false
            }
        }
    }

    /// Enqueue a batch ("print all pending"). Returns how many were queued.
    pub fn enqueue_all(&self, jobs: impl IntoIterator<Item = PrintJob>) -> usize {
        let mut queued = 0;
        for job in jobs {
            if self.enqueue(job) {
                queued += 1;
            }
        }
        queued
    }
}
