//! Outbound manifest fetch.
//!
//! One pooled `reqwest` client lives in [`AppState`](crate::config::AppState)
//! and is shared by every request. Redirects are followed by the client; the
//! URL it finally landed on is kept because relative base URLs resolve
//! against it.

use hyper::body::Bytes;
use hyper::header::HeaderMap;
use hyper::StatusCode;
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::error::RelayError;

/// Upstream response, fully buffered
#[derive(Debug)]
pub struct FetchedManifest {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// URL after redirects
    pub final_url: String,
    pub body: Bytes,
}

/// Create the shared HTTP client
///
/// Connects directly; proxy environment variables are ignored.
pub fn build_client(config: &UpstreamConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(config.timeout_secs))
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .user_agent(config.user_agent.as_str())
        .build()
}

/// Issue a single GET; no retries.
pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<FetchedManifest, RelayError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| RelayError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    let headers = response.headers().clone();
    let final_url = response.url().to_string();
    if final_url != url {
        tracing::debug!(source_url = url, final_url = %final_url, "followed redirect");
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| RelayError::ReadBody {
            url: final_url.clone(),
            source,
        })?;

    Ok(FetchedManifest {
        status,
        headers,
        final_url,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Overrides, RelayConfig};

    #[tokio::test]
    async fn test_unreachable_upstream_is_fetch_error() {
        let cfg = RelayConfig::load_from(None, &Overrides::default()).unwrap();
        let client = build_client(&cfg.upstream).unwrap();

        // port 9 on loopback is the discard service, normally closed
        let err = fetch(&client, "http://127.0.0.1:9/manifest.mpd")
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_invalid_url_is_fetch_error() {
        let cfg = RelayConfig::load_from(None, &Overrides::default()).unwrap();
        let client = build_client(&cfg.upstream).unwrap();

        let err = fetch(&client, "not a url").await.unwrap_err();
        assert!(matches!(err, RelayError::Fetch { .. }));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
