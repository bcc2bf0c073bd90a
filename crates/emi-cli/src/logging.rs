//! Tracing subscriber setup. Logs go to stderr so stdout stays parseable.

use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` wins over `level` when set.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
