//! Logging Infrastructure
//!
//! Structured logging setup. `RUST_LOG` takes precedence when set, so a
//! single noisy module can be silenced without touching the config.

use tracing_subscriber::EnvFilter;

/// Initialize the logger with terminal output
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger, optionally writing daily-rolled files to `log_dir`
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    match log_dir {
        Some(dir) if std::path::Path::new(dir).exists() => {
            let file_appender = tracing_appender::rolling::daily(dir, "comanda-server");
            subscriber.with_writer(file_appender).with_ansi(false).init();
        }
        Some(dir) => {
            subscriber.init();
            tracing::warn!(dir, "Log directory does not exist, logging to terminal");
        }
        None => subscriber.init(),
    }
}
