//! # Short URL Service
//!
//! An in-memory URL shortener with expiring shortcodes and per-code click
//! analytics (timestamp, referrer, coarse geolocation), built with Axum.
//!
//! ## Architecture
//!
//! The crate is split into layers:
//!
//! - **Domain Layer** ([`domain`]) - Entities, request context and the repository trait
//! - **Application Layer** ([`application`]) - The shortener service
//! - **Infrastructure Layer** ([`infrastructure`]) - In-memory store, geolocation, audit logging
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Features
//!
//! - Random 6-character or custom (3-20 alphanumeric) shortcodes
//! - Expiry in minutes (default 30), checked when a link is resolved
//! - Click history with referrer and "Country, Region" location
//! - Best-effort remote audit logging with console fallback
//!
//! ## Quick Start
//!
//! ```bash
//! export BASE_URL="https://sho.rt"
//! export AUDIT_LOG_URL="http://localhost:4000/logs"  # Optional
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.
//!
//! State lives in process memory only; nothing survives a restart.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{CreatedShortLink, ShortenerService, ShortenerSettings};
    pub use crate::domain::RequestContext;
    pub use crate::domain::entities::{Click, Link, NewLink};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
