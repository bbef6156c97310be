//! HTTP middleware module.
//!
//! This module provides HTTP-level middleware for:
//! - CORS configuration
//! - Security headers

pub mod cors;
pub mod security;

// Re-export commonly used functions
pub use cors::{create_cors_layer, create_permissive_cors_layer};
pub use security::security_headers;
