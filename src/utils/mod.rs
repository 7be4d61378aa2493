//! Utility functions for code generation, URL validation, and request handling.
//!
//! - [`code_generator`] - Shortcode generation and validation
//! - [`url_validator`] - Structural URL parsing
//! - [`client_ip`] - Client address extraction and loopback detection
//! - [`timestamp`] - Millisecond RFC 3339 formatting for responses

pub mod client_ip;
pub mod code_generator;
pub mod timestamp;
pub mod url_validator;
