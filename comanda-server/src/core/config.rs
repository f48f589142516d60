/// 引擎配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATA_DIR | /var/lib/comanda | 数据目录 (redb 文件) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志文件目录，未设置则输出到终端 |
/// | FEED_CHANNEL_CAPACITY | 1024 | 每租户推送通道容量 |
/// | PRINT_QUEUE_CAPACITY | 64 | 打印队列容量 |
/// | PRINT_INTER_JOB_DELAY_MS | 300 | 打印任务间隔(毫秒) |
/// | RETRY_MAX_ATTEMPTS | 3 | 存储瞬时错误重试次数 |
/// | RETRY_BASE_DELAY_MS | 100 | 重试基础退避(毫秒) |
/// | PRINTER_ADDR | (无) | 网络打印机地址 (host:9100) |
/// | TICKET_WIDTH | 48 | 票据宽度(字符) |
/// | DISPLAY_NAME | Comanda | 票据抬头显示名 |
///
/// # 示例
///
/// ```ignore
/// DATA_DIR=/data/comanda PRINTER_ADDR=192.168.1.50:9100 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 数据目录，存储 redb 数据库文件
    pub data_dir: String,
    /// 日志级别
    pub log_level: String,
    /// 日志文件目录 (可选)
    pub log_dir: Option<String>,
    /// 每租户广播通道容量
    pub feed_channel_capacity: usize,
    /// 打印队列容量
    pub print_queue_capacity: usize,
    /// 打印任务之间的间隔，避免原生打印对话框重叠
    pub print_inter_job_delay_ms: u64,
    /// 存储瞬时错误重试预算
    pub retry_max_attempts: u32,
    /// 重试基础退避时间 (毫秒，指数递增)
    pub retry_base_delay_ms: u64,
    /// 网络打印机地址 (可选；未设置时打印任务仅记录日志)
    pub printer_addr: Option<String>,
    /// 票据宽度 (字符数: 58mm 纸 32, 80mm 纸 48)
    pub ticket_width: usize,
    /// 票据抬头显示名
    pub display_name: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/var/lib/comanda".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            feed_channel_capacity: std::env::var("FEED_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024),
            print_queue_capacity: std::env::var("PRINT_QUEUE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(64),
            print_inter_job_delay_ms: std::env::var("PRINT_INTER_JOB_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            retry_max_attempts: std::env::var("RETRY_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            retry_base_delay_ms: std::env::var("RETRY_BASE_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            printer_addr: std::env::var("PRINTER_ADDR").ok(),
            ticket_width: std::env::var("TICKET_WIDTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(48),
            display_name: std::env::var("DISPLAY_NAME").unwrap_or_else(|_| "Comanda".into()),
        }
    }

    /// 使用自定义数据目录覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_data_dir(data_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.data_dir = data_dir.into();
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
