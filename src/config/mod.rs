// Configuration module entry point
// Layered defaults, optional file and command-line overrides

mod state;
mod types;

use std::net::SocketAddr;

use thiserror::Error;

// Re-export public types
pub use state::AppState;
pub use types::{HttpConfig, LoggingConfig, RelayConfig, ServerConfig, UpstreamConfig};

pub const DEFAULT_PORT: u16 = 10079;

const ACCESS_LOG_FORMATS: &[&str] = &["combined", "common", "json"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Values supplied on the command line, applied over every other source
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

impl RelayConfig {
    /// Build the configuration from defaults, an optional file and overrides.
    ///
    /// Without a file the result depends only on the defaults and `overrides`.
    pub fn load_from(
        config_path: Option<&str>,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("upstream.timeout_secs", 60)?
            .set_default("upstream.pool_max_idle_per_host", 100)?
            .set_default("upstream.max_redirects", 10)?
            .set_default(
                "upstream.user_agent",
                concat!("mpd-relay/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("http.health_path", "")?;

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        if let Some(host) = &overrides.host {
            builder = builder.set_override("server.host", host.as_str())?;
        }
        if let Some(port) = overrides.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(level) = &overrides.log_level {
            builder = builder.set_override("logging.level", level.as_str())?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "upstream.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if !ACCESS_LOG_FORMATS.contains(&self.logging.access_log_format.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "unknown logging.access_log_format '{}' (expected one of {})",
                self.logging.access_log_format,
                ACCESS_LOG_FORMATS.join(", ")
            )));
        }
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("invalid listen address: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = RelayConfig::load_from(None, &Overrides::default()).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 10079);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.upstream.timeout_secs, 60);
        assert_eq!(cfg.upstream.pool_max_idle_per_host, 100);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.http.landing_page, None);
        assert_eq!(cfg.http.health_path, "");
    }

    #[test]
    fn test_overrides_win() {
        let overrides = Overrides {
            host: Some("127.0.0.1".to_string()),
            port: Some(8081),
            log_level: Some("debug".to_string()),
        };
        let cfg = RelayConfig::load_from(None, &overrides).unwrap();
        assert_eq!(cfg.get_socket_addr().unwrap().to_string(), "127.0.0.1:8081");
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn test_file_source() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[upstream]\ntimeout_secs = 5\n\n[logging]\naccess_log_format = \"json\""
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let overrides = Overrides {
            port: Some(9000),
            ..Overrides::default()
        };
        let cfg = RelayConfig::load_from(Some(path.as_str()), &overrides).unwrap();
        assert_eq!(cfg.upstream.timeout_secs, 5);
        assert_eq!(cfg.logging.access_log_format, "json");
        assert_eq!(cfg.server.port, 9000);
    }

    #[test]
    fn test_rejects_unknown_access_log_format() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[logging]\naccess_log_format = \"xml\"").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let err = RelayConfig::load_from(Some(path.as_str()), &Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = RelayConfig::load_from(Some("/nonexistent/relay.toml"), &Overrides::default());
        assert!(result.is_err());
    }
}
