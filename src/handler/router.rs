//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: the optional health probe, then
//! landing page or relay depending on the query string. Path and method do not
//! select a branch; `HEAD` only drops the body.

use crate::config::AppState;
use crate::error::RelayError;
use crate::handler::{landing, relay};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, _) = req.into_parts();
    let response = route_request(&parts, &state).await;

    if state.config.logging.access_log {
        let entry = access_entry(&parts, &response, remote_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn route_request(req: &Parts, state: &AppState) -> Response<Full<Bytes>> {
    let is_head = req.method == Method::HEAD;
    let path = req.uri.path();
    let query = req.uri.query().filter(|q| !q.is_empty());

    // 1. Health probe, opt-in, never touches the upstream
    let health_path = state.config.http.health_path.as_str();
    if query.is_none() && !health_path.is_empty() && path == health_path {
        return http::build_health_response(is_head);
    }

    // 2. Landing page or relay
    let result = match query {
        None => landing::serve(state, is_head).await,
        Some(query) => match relay::RelayParams::from_query(query) {
            Ok(params) => relay::serve(&params, state, is_head).await,
            Err(e) => Err(e),
        },
    };

    result.unwrap_or_else(|err| {
        log_relay_error(&err);
        http::build_error_response(&err)
    })
}

fn log_relay_error(err: &RelayError) {
    match err {
        RelayError::MissingParameter => tracing::warn!(error = %err, "rejected relay request"),
        _ => tracing::error!(error = %err, status = err.status().as_u16(), "request failed"),
    }
}

fn access_entry(
    req: &Parts,
    response: &Response<Full<Bytes>>,
    remote_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method.to_string(),
        req.uri.path().to_string(),
    );
    entry.query = req.uri.query().map(ToString::to_string);
    entry.http_version = match req.version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Overrides, RelayConfig};
    use hyper::StatusCode;
    use http_body_util::BodyExt;
    use std::io::Write;

    fn state_with(config: RelayConfig) -> Arc<AppState> {
        Arc::new(AppState::new(config).unwrap())
    }

    fn default_state() -> Arc<AppState> {
        state_with(RelayConfig::load_from(None, &Overrides::default()).unwrap())
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    async fn call(state: Arc<AppState>, method: Method, uri: &str) -> Response<Full<Bytes>> {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        handle_request(req, state, peer()).await.unwrap()
    }

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_no_query_serves_bundled_page() {
        let resp = call(default_state(), Method::GET, "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_bytes(resp).await, landing::BUNDLED_PAGE.as_bytes());
    }

    #[tokio::test]
    async fn test_empty_query_serves_bundled_page() {
        let resp = call(default_state(), Method::GET, "/?").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_bytes(resp).await, landing::BUNDLED_PAGE.as_bytes());
    }

    #[tokio::test]
    async fn test_missing_parameter_is_400() {
        let resp = call(default_state(), Method::GET, "/?sourceUrl=http://o/a.mpd").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_bytes(resp).await,
            "missing required parameter: sourceUrl or proxyUrl"
        );
    }

    #[tokio::test]
    async fn test_head_landing_page_has_no_body() {
        let resp = call(default_state(), Method::HEAD, "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_any_path_and_method_without_query_serves_bundled_page() {
        let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS];
        let paths = ["/", "/healthz", "/index.html", "/a/b/c", "/?"];
        for method in methods {
            for path in paths {
                let resp = call(default_state(), method.clone(), path).await;
                assert_eq!(resp.status(), StatusCode::OK, "{method} {path}");
                assert_eq!(
                    body_bytes(resp).await,
                    landing::BUNDLED_PAGE.as_bytes(),
                    "{method} {path}"
                );
            }
        }
    }

    #[tokio::test]
    async fn test_post_with_query_is_relayed() {
        let resp = call(default_state(), Method::POST, "/?proxyUrl=https://px/").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_probe_when_configured() {
        let mut config = RelayConfig::load_from(None, &Overrides::default()).unwrap();
        config.http.health_path = "/healthz".to_string();
        let state = state_with(config);

        let resp = call(Arc::clone(&state), Method::GET, "/healthz").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_bytes(resp).await, "ok");

        let resp = call(state, Method::GET, "/").await;
        assert_eq!(body_bytes(resp).await, landing::BUNDLED_PAGE.as_bytes());
    }

    #[tokio::test]
    async fn test_landing_page_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<h1>custom</h1>").unwrap();

        let mut config = RelayConfig::load_from(None, &Overrides::default()).unwrap();
        config.http.landing_page = Some(file.path().to_string_lossy().into_owned());
        let resp = call(state_with(config), Method::GET, "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_bytes(resp).await, "<h1>custom</h1>");
    }

    #[tokio::test]
    async fn test_missing_landing_page_is_500() {
        let mut config = RelayConfig::load_from(None, &Overrides::default()).unwrap();
        config.http.landing_page = Some("/nonexistent/index.html".to_string());
        let resp = call(state_with(config), Method::GET, "/").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_bytes(resp).await, "internal server error");
    }
}
