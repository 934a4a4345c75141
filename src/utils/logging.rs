use tracing_subscriber::{fmt, EnvFilter};

/// Routes `log` records through a `tracing` fmt subscriber, filtered by
/// `RUST_LOG` (default `info`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
