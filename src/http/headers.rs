//! Response header bookkeeping for relayed manifests.
//!
//! Upstream headers are forwarded except the ones that describe the original
//! body or the upstream connection; those are recomputed for this hop.

use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, CONNECTION, CONTENT_DISPOSITION, CONTENT_LENGTH,
    TRANSFER_ENCODING,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything outside RFC 5987 `attr-char` is escaped in the `ext-value`.
/// `%` passes through since names taken from URLs arrive percent-encoded.
const FILENAME_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~')
    .remove(b'%');

/// Upstream headers that never pass through verbatim
pub fn is_stripped(name: &HeaderName) -> bool {
    *name == CONNECTION
        || *name == CONTENT_DISPOSITION
        || *name == CONTENT_LENGTH
        || *name == TRANSFER_ENCODING
        || name.as_str() == "proxy-connection"
}

/// `attachment; filename*=UTF-8''<name>`
pub fn content_disposition(filename: &str) -> String {
    format!(
        "attachment; filename*=UTF-8''{}",
        utf8_percent_encode(filename, FILENAME_ENCODE)
    )
}

/// Build the outbound header set for a rewritten manifest of `body_len` bytes.
pub fn relay_headers(upstream: &HeaderMap, filename: &str, body_len: usize) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len() + 3);

    for (name, value) in upstream {
        if is_stripped(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    match HeaderValue::from_str(&content_disposition(filename)) {
        Ok(value) => {
            headers.insert(CONTENT_DISPOSITION, value);
        }
        Err(e) => tracing::warn!(filename, error = %e, "unusable download filename"),
    }
    headers.insert(CONTENT_LENGTH, HeaderValue::from(body_len));
    headers.insert(CONNECTION, HeaderValue::from_static("close"));

    headers
}
