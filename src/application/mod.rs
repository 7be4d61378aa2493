//! Application layer services implementing business logic.
//!
//! Services consume repository traits and outbound collaborators and provide
//! a small API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::ShortenerService`] - Shortcode issuance, redirects and click statistics

pub mod services;
