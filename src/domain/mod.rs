//! Domain layer containing business entities and repository contracts.
//!
//! - [`entities`] - Links, clicks and click statistics
//! - [`repositories`] - Data access trait definitions
//! - [`request_context`] - Client metadata captured on redirect
//!
//! The domain layer has no dependency on HTTP or on concrete storage.
//! Repository traits are implemented in `crate::infrastructure::persistence`.

pub mod entities;
pub mod repositories;
pub mod request_context;

pub use request_context::RequestContext;
