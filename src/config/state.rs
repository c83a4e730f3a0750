// Application state module
// Everything a request handler needs, built once at startup

use super::types::RelayConfig;
use crate::upstream;

/// Application state
///
/// Shared read-only between connection tasks. The only pooled resource is
/// the outbound client.
pub struct AppState {
    pub config: RelayConfig,
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let client = upstream::build_client(&config.upstream)?;
        Ok(Self { config, client })
    }
}
