//! Fetch, rewrite and forward a manifest.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::CONTENT_DISPOSITION;
use hyper::Response;
use url::form_urlencoded;

use crate::config::AppState;
use crate::error::RelayError;
use crate::http;
use crate::manifest::{self, filename};
use crate::upstream;

const SOURCE_KEYS: &[&str] = &["sourceUrl", "mpdurl"];
const PROXY_KEYS: &[&str] = &["proxyUrl", "proxyurl"];

/// Query parameters of a relay request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayParams {
    /// Manifest location
    pub source_url: String,
    /// Prepended to the resolved base URL
    pub proxy_prefix: String,
}

impl RelayParams {
    /// Parse a raw query string.
    ///
    /// The first occurrence of a parameter (under either of its names) wins,
    /// even when empty. Both values must end up non-empty.
    pub fn from_query(query: &str) -> Result<Self, RelayError> {
        let mut source_url: Option<String> = None;
        let mut proxy_prefix: Option<String> = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if source_url.is_none() && SOURCE_KEYS.contains(&key.as_ref()) {
                source_url = Some(value.into_owned());
            } else if proxy_prefix.is_none() && PROXY_KEYS.contains(&key.as_ref()) {
                proxy_prefix = Some(value.into_owned());
            }
        }

        match (source_url, proxy_prefix) {
            (Some(source_url), Some(proxy_prefix))
                if !source_url.is_empty() && !proxy_prefix.is_empty() =>
            {
                Ok(Self {
                    source_url,
                    proxy_prefix,
                })
            }
            _ => Err(RelayError::MissingParameter),
        }
    }
}

/// Run one relay cycle. The upstream status is mirrored on success.
pub async fn serve(
    params: &RelayParams,
    state: &AppState,
    is_head: bool,
) -> Result<Response<Full<Bytes>>, RelayError> {
    let fetched = upstream::fetch(&state.client, &params.source_url).await?;

    let rewritten = manifest::rewrite(&fetched.body, &fetched.final_url, &params.proxy_prefix)
        .ok_or_else(|| RelayError::BaseUrlNotFound {
            url: fetched.final_url.clone(),
        })?;
    if rewritten.is_empty() {
        return Err(RelayError::EmptyOutput {
            url: fetched.final_url,
        });
    }

    let upstream_disposition = fetched
        .headers
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok());
    let name = filename::resolve(upstream_disposition, &fetched.final_url);
    let headers = http::relay_headers(&fetched.headers, &name, rewritten.len());

    tracing::info!(
        source_url = %params.source_url,
        final_url = %fetched.final_url,
        status = fetched.status.as_u16(),
        upstream_bytes = fetched.body.len(),
        bytes = rewritten.len(),
        filename = %name,
        "relayed manifest"
    );

    Ok(http::build_relay_response(
        fetched.status,
        headers,
        Bytes::from(rewritten),
        is_head,
    ))
}
