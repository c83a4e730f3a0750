//! Landing page served when a request carries no query string.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::AppState;
use crate::error::RelayError;
use crate::http;

/// Page compiled into the binary
pub const BUNDLED_PAGE: &str = include_str!("../../static/index.html");

/// Serve the bundled page, or the configured override read from disk.
pub async fn serve(state: &AppState, is_head: bool) -> Result<Response<Full<Bytes>>, RelayError> {
    let content = match &state.config.http.landing_page {
        Some(path) => tokio::fs::read(path)
            .await
            .map(Bytes::from)
            .map_err(|source| RelayError::LandingPage {
                path: path.clone(),
                source,
            })?,
        None => Bytes::from_static(BUNDLED_PAGE.as_bytes()),
    };

    Ok(http::build_html_response(content, is_head))
}
