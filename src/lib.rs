//! MPEG-DASH manifest relay.
//!
//! Fetches a remote MPD, points its `<BaseURL>` through a caller supplied
//! proxy prefix and returns the rewritten document. Requests without a query
//! string get a bundled landing page.

pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod manifest;
pub mod server;
pub mod upstream;

pub use config::{AppState, RelayConfig};
pub use error::RelayError;
