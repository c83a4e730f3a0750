//! Download filename for the rewritten manifest.

use regex::Regex;
use std::sync::LazyLock;

/// Greedy prefix so the last quoted `filename` parameter wins.
static QUOTED_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i).*filename="([^"]+)""#).expect("filename pattern is valid")
});

/// Extract `filename="..."` from an upstream `Content-Disposition` value.
///
/// Only the quoted form is recognised; `filename*=` and bare tokens are ignored.
pub fn from_content_disposition(value: &str) -> Option<String> {
    QUOTED_FILENAME
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Last path segment of `url`, stopping at the query string.
pub fn from_url(url: &str) -> &str {
    let path = url.find('?').map_or(url, |idx| &url[..idx]);
    path.rfind('/').map_or(path, |idx| &path[idx + 1..])
}

/// Pick the filename: upstream header first, then the final URL.
pub fn resolve(content_disposition: Option<&str>, final_url: &str) -> String {
    content_disposition
        .and_then(from_content_disposition)
        .unwrap_or_else(|| from_url(final_url).to_string())
}
