//! Tracing initialization.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, ServerConfig};

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let _ = match config.log_format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}
