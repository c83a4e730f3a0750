//! Request error taxonomy.
//!
//! Every variant is terminal for the request. The `Display` text is what
//! gets logged; clients only ever see [`RelayError::client_message`].

use hyper::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// `sourceUrl` or `proxyUrl` absent or empty.
    #[error("missing required query parameter")]
    MissingParameter,

    /// Outbound request could not be completed.
    #[error("fetching {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered but the body could not be read.
    #[error("reading response body from {url} failed: {source}")]
    ReadBody {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Manifest has no `<BaseURL>` element.
    #[error("no <BaseURL> element in manifest from {url}")]
    BaseUrlNotFound { url: String },

    /// Substitution produced an empty document.
    #[error("rewritten manifest from {url} is empty")]
    EmptyOutput { url: String },

    /// Landing page could not be opened.
    #[error("landing page {path} unavailable: {source}")]
    LandingPage {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl RelayError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingParameter => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short plain-text message without internal detail.
    pub const fn client_message(&self) -> &'static str {
        match self {
            Self::MissingParameter => "missing required parameter: sourceUrl or proxyUrl",
            Self::Fetch { .. } => "failed to fetch source manifest",
            Self::ReadBody { .. } => "failed to read source manifest",
            Self::BaseUrlNotFound { .. } => "base URL not found in manifest",
            Self::EmptyOutput { .. } => "generated content is empty",
            Self::LandingPage { .. } => "internal server error",
        }
    }
}
