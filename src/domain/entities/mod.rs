//! Core domain entities representing the business data model.
//!
//! - [`Link`] - A shortcode mapped to its original URL and lifetime
//! - [`Click`] - A single redirect event
//! - [`ClickStats`] - The append-only click history owned by one link
//!
//! Creation inputs use separate structs (`NewLink`, `NewClick`).

pub mod click;
pub mod link;

pub use click::{Click, ClickStats, DIRECT_REFERRER, LOCAL_LOCATION, NewClick, UNKNOWN_LOCATION};
pub use link::{DEFAULT_VALIDITY_MINUTES, Link, NewLink};
