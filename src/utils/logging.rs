//! Logging initialization.
//!
//! Structured JSON logging to stdout and a daily-rolling log file.

use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter: our crate at debug, everything else at info, and the
/// per-statement query logging from sqlx capped at warn.
const DEFAULT_FILTER: &str = "info,dreampsyche_server=debug,sqlx=warn";

/// Initializes the logging system.
///
/// Log level comes from `RUST_LOG`; output goes to stdout and `LOG_DIR`
/// (default `logs/`) as `dreampsyche.log.YYYY-MM-DD`.
///
/// The returned `WorkerGuard` must be held by main so buffered log lines are
/// flushed on shutdown.
pub fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

    let file_appender = rolling::daily(&log_dir, "dreampsyche.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let stdout_layer = fmt::layer()
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_current_span(true);

    let file_layer = fmt::layer()
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_current_span(true)
        .with_ansi(false)
        .with_writer(non_blocking);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // Repeated init (tests spin the server up more than once) is harmless;
    // the server still starts with whatever subscriber won.
    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
    {
        eprintln!("tracing init skipped: {}", err);
    }

    guard
}
