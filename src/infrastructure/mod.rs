//! Infrastructure layer for storage and external integrations.
//!
//! This layer implements interfaces defined by the domain layer and the
//! outbound collaborators the service talks to.
//!
//! # Modules
//!
//! - [`persistence`] - In-memory link store
//! - [`geo`] - IP geolocation (HTTP lookup and disabled variant)
//! - [`audit`] - Fire-and-forget remote audit logging

pub mod audit;
pub mod geo;
pub mod persistence;
