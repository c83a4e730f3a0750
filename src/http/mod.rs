//! HTTP protocol layer module
//!
//! Response builders and header bookkeeping, decoupled from the relay logic.

pub mod headers;
pub mod response;

// Re-export commonly used types
pub use headers::relay_headers;
pub use response::{
    build_error_response, build_health_response, build_html_response, build_relay_response,
    build_text_response,
};
