//! `<BaseURL>` location and rewriting.
//!
//! The manifest is handled as raw bytes with a pattern match rather than an
//! XML parser, so malformed documents pass through untouched apart from the
//! rewritten element.

use regex::bytes::Regex;
use std::sync::LazyLock;

/// First `<BaseURL>` element on a single line, non-greedy.
static BASE_URL_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<BaseURL>((?-u:.)*?)</BaseURL>").expect("BaseURL pattern is valid")
});

/// The first `<BaseURL>` element found in a manifest
#[derive(Debug, PartialEq, Eq)]
pub struct BaseUrlMatch<'a> {
    /// Whole element text, tags included
    pub tag: &'a [u8],
    /// Element content
    pub value: &'a [u8],
}

pub fn find(manifest: &[u8]) -> Option<BaseUrlMatch<'_>> {
    let caps = BASE_URL_TAG.captures(manifest)?;
    let tag = caps.get(0)?.as_bytes();
    let value = caps.get(1)?.as_bytes();
    Some(BaseUrlMatch { tag, value })
}

/// True when the base URL carries its own `http://` or `https://` scheme.
///
/// The scheme is matched case-insensitively and must include `://`; a bare
/// `http` prefix such as `httpdocs/` is relative.
pub fn is_absolute(base_url: &[u8]) -> bool {
    has_prefix_ignore_case(base_url, b"http://") || has_prefix_ignore_case(base_url, b"https://")
}

fn has_prefix_ignore_case(value: &[u8], prefix: &[u8]) -> bool {
    value.len() >= prefix.len() && value[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Everything up to and including the last `/` of `url`.
///
/// Returns an empty string when `url` has no `/` at all.
pub fn directory_of(url: &str) -> &str {
    url.rfind('/').map_or("", |idx| &url[..=idx])
}

/// Compute the new `<BaseURL>` content.
///
/// Absolute base URLs are prefixed directly. Relative ones are first anchored
/// at the directory of `final_url`, the URL the manifest was actually served
/// from after redirects.
pub fn proxied_value(base_url: &[u8], final_url: &str, proxy_prefix: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(proxy_prefix.len() + final_url.len() + base_url.len());
    out.extend_from_slice(proxy_prefix.as_bytes());
    if !is_absolute(base_url) {
        out.extend_from_slice(directory_of(final_url).as_bytes());
    }
    out.extend_from_slice(base_url);
    out
}

/// Rewrite the manifest so its base URL routes through `proxy_prefix`.
///
/// Every occurrence of the first matched element's exact text is replaced;
/// `<BaseURL>` elements with different content are left alone. Returns `None`
/// when the manifest has no `<BaseURL>` element.
pub fn rewrite(manifest: &[u8], final_url: &str, proxy_prefix: &str) -> Option<Vec<u8>> {
    let found = find(manifest)?;
    let value = proxied_value(found.value, final_url, proxy_prefix);

    let mut replacement = Vec::with_capacity(value.len() + 19);
    replacement.extend_from_slice(b"<BaseURL>");
    replacement.extend_from_slice(&value);
    replacement.extend_from_slice(b"</BaseURL>");

    Some(replace_all_literal(manifest, found.tag, &replacement))
}

fn replace_all_literal(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len() + replacement.len());
    let mut rest = haystack;
    while let Some(pos) = find_subslice(rest, needle) {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(replacement);
        rest = &rest[pos + needle.len()..];
    }
    out.extend_from_slice(rest);
    out
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
