//! Logger module
//!
//! Diagnostics go through `tracing`; the subscriber is configured once from
//! [`LoggingConfig`] at startup. Access lines are formatted by
//! [`AccessLogEntry`] and emitted on the `access` target.

mod format;

pub use format::AccessLogEntry;

use crate::config::{LoggingConfig, RelayConfig};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

pub type InitError = Box<dyn std::error::Error + Send + Sync>;

/// Install the global subscriber
///
/// The filter comes from `logging.level` only; `RUST_LOG` is not consulted.
pub fn init(config: &LoggingConfig) -> Result<(), InitError> {
    let filter = EnvFilter::try_new(&config.level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
}

pub fn log_server_start(addr: &SocketAddr, config: &RelayConfig) {
    tracing::info!(
        listen = %addr,
        log_level = %config.logging.level,
        access_log = config.logging.access_log,
        upstream_timeout_secs = config.upstream.timeout_secs,
        landing_page = config.http.landing_page.as_deref().unwrap_or("<bundled>"),
        "mpd relay listening on http://{addr}"
    );
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}

pub fn log_connection_error(err: &hyper::Error) {
    tracing::warn!(error = %err, "failed to serve connection");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_rejects_bad_filter() {
        let config = LoggingConfig {
            level: "mpd_relay=verbose".to_string(),
            access_log: false,
            access_log_format: "combined".to_string(),
        };
        assert!(init(&config).is_err());
    }
}
