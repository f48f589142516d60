use comanda_server::printing::{
    EscPosTicketRenderer, LogDispatcher, NetworkDispatcher, PrintDispatcher, PrintQueueConfig,
    PrintQueueService, TicketRenderer,
};
use comanda_server::notify::TracingSink;
use comanda_server::{
    Config, DashboardFeed, FeedBus, OrderStore, RetryPolicy, Storage, init_logger_with_file,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境与日志
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!("Comanda engine starting...");

    // 2. 持久化网关
    std::fs::create_dir_all(&config.data_dir)?;
    let storage = Storage::open(Path::new(&config.data_dir).join("comanda.redb"))?;
    let retry = RetryPolicy::new(
        config.retry_max_attempts,
        Duration::from_millis(config.retry_base_delay_ms),
    );

    // 3. 实时推送与订单仓库
    let bus = Arc::new(FeedBus::with_capacity(config.feed_channel_capacity));
    let store = Arc::new(OrderStore::new(storage, bus.clone(), retry));
    let shutdown = bus.shutdown_token().clone();

    // 4. 打印队列
    let renderer: Arc<dyn TicketRenderer> = Arc::new(EscPosTicketRenderer);
    let dispatcher: Arc<dyn PrintDispatcher> = match &config.printer_addr {
        Some(addr) => {
            tracing::info!(addr = %addr, "Using network printer");
            Arc::new(NetworkDispatcher::from_addr(addr)?)
        }
        None => {
            tracing::warn!("PRINTER_ADDR not set, tickets will be logged and discarded");
            Arc::new(LogDispatcher)
        }
    };
    let _print_queue = PrintQueueService::start(
        renderer,
        dispatcher,
        PrintQueueConfig {
            queue_capacity: config.print_queue_capacity,
            inter_job_delay: Duration::from_millis(config.print_inter_job_delay_ms),
        },
        shutdown.clone(),
    );

    // 5. 租户仪表盘消费端
    let tenant_id = std::env::var("TENANT_ID").unwrap_or_else(|_| "demo".into());
    let dashboard = DashboardFeed::new(tenant_id.clone(), store, Arc::new(TracingSink));
    tokio::spawn(dashboard.run(shutdown.clone()));
    tracing::info!(tenant_id = %tenant_id, "Engine ready");

    // 6. 等待退出信号
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    bus.shutdown();

    Ok(())
}
