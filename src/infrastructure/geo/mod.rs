//! IP geolocation used when recording clicks.
//!
//! Provides a [`GeoLookup`] trait with two implementations:
//! - [`IpApiGeoLookup`] - external JSON API with a bounded timeout
//! - [`NullGeoLookup`] - no-op when lookups are disabled

mod ip_api;
mod null_geo;
mod service;

pub use ip_api::{DEFAULT_GEO_LOOKUP_URL, IpApiGeoLookup};
pub use null_geo::NullGeoLookup;
pub use service::{GeoInfo, GeoLookup};

#[cfg(test)]
pub use service::MockGeoLookup;
