//! No-op geolocation for deployments without outbound lookups.

use super::service::{GeoInfo, GeoLookup};
use async_trait::async_trait;
use tracing::debug;

/// A lookup that never resolves anything.
///
/// Every non-local click is recorded with location `"Unknown"`.
pub struct NullGeoLookup;

impl NullGeoLookup {
    pub fn new() -> Self {
        debug!("Using NullGeoLookup (geolocation disabled)");
        Self
    }
}

impl Default for NullGeoLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeoLookup for NullGeoLookup {
    async fn lookup(&self, _ip: &str) -> Option<GeoInfo> {
        None
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}
