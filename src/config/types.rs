// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
    pub http: HttpConfig,
}

/// Listening socket and runtime sizing
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Outbound client used to fetch manifests
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Whole-request timeout, connect through body read
    pub timeout_secs: u64,
    pub pool_max_idle_per_host: usize,
    pub max_redirects: usize,
    pub user_agent: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    pub access_log_format: String,
}

/// HTTP surface configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Serve this file instead of the bundled landing page
    #[serde(default)]
    pub landing_page: Option<String>,
    /// Liveness probe path, empty to disable
    pub health_path: String,
}
