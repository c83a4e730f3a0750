//! Request handler module
//!
//! Routing plus the two request branches: landing page and manifest relay.

pub mod landing;
pub mod relay;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
