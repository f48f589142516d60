//! Print worker
//!
//! 监听打印任务通道，严格 FIFO 排空。单个任务的渲染或分发失败只记录
//! 日志，不中断后续任务（打印是逐单 best-effort，不是全有或全无）。

use super::types::{PrintDispatcher, PrintJob, TicketRenderer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// FIFO draining worker: one job in flight at a time
pub struct PrintWorker {
    renderer: Arc<dyn TicketRenderer>,
    dispatcher: Arc<dyn PrintDispatcher>,
    /// Pause between dispatches to avoid overlapping native print flows
    inter_job_delay: Duration,
}

impl PrintWorker {
    pub fn new(
        renderer: Arc<dyn TicketRenderer>,
        dispatcher: Arc<dyn PrintDispatcher>,
        inter_job_delay: Duration,
    ) -> Self {
        Self {
            renderer,
            dispatcher,
            inter_job_delay,
        }
    }

    /// 运行工作者（阻塞直到通道关闭或收到关闭信号）
    pub async fn run(self, mut job_rx: mpsc::Receiver<PrintJob>, shutdown: CancellationToken) {
        tracing::info!("Print worker started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Print worker received shutdown signal");
                    break;
                }
                job = job_rx.recv() => {
                    let Some(job) = job else {
                        tracing::info!("Print channel closed, print worker stopping");
                        break;
                    };
                    self.process(job).await;
                    tokio::time::sleep(self.inter_job_delay).await;
                }
            }
        }
    }

    /// Render and dispatch one job, isolating its failures.
    async fn process(&self, job: PrintJob) {
        let order_id = job.order.id.clone();

        let document = match self.renderer.render(&job) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::error!(order_id = %order_id, error = %e, "Ticket render failed, skipping job");
                return;
            }
        };

        tracing::debug!(order_id = %order_id, bytes = document.len(), "Dispatching ticket");
        if let Err(e) = self.dispatcher.dispatch(&document).await {
            tracing::error!(order_id = %order_id, error = %e, "Print dispatch failed");
        }
    }
}
