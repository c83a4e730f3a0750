//! Command-line flags.

use clap::Parser;

use crate::config::Overrides;

/// HTTP relay that rewrites the BaseURL of MPEG-DASH manifests
#[derive(Debug, Parser)]
#[command(name = "mpd-relay", version, about)]
pub struct Cli {
    /// TCP port to listen on [default: 10079]
    #[arg(long)]
    pub port: Option<u16>,

    /// Address to bind [default: 0.0.0.0]
    #[arg(long)]
    pub host: Option<String>,

    /// Optional configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<String>,

    /// Log filter, e.g. `info` or `mpd_relay=debug` [default: info]
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Command-line values that take precedence over the config file
    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            log_level: self.log_level.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_means_no_overrides() {
        let cli = Cli::try_parse_from(["mpd-relay"]).unwrap();
        let overrides = cli.overrides();
        assert!(overrides.port.is_none());
        assert!(overrides.host.is_none());
        assert!(overrides.log_level.is_none());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "mpd-relay",
            "--port",
            "8080",
            "--host",
            "127.0.0.1",
            "--config",
            "relay.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.config.as_deref(), Some("relay.toml"));
        let overrides = cli.overrides();
        assert_eq!(overrides.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(overrides.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(Cli::try_parse_from(["mpd-relay", "--port", "http"]).is_err());
    }
}
