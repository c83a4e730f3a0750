//! Manifest transformation
//!
//! Pure functions over the fetched document; no I/O happens here.

pub mod base_url;
pub mod filename;

pub use base_url::rewrite;
