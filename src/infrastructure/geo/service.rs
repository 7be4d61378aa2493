//! Geolocation trait and result type.

use async_trait::async_trait;

/// Coarse location of an IP address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoInfo {
    pub country: Option<String>,
    pub region: Option<String>,
}

impl GeoInfo {
    /// Formats as `"Country"` or `"Country, Region"`.
    ///
    /// Returns `None` without a country; an empty region is omitted.
    pub fn describe(&self) -> Option<String> {
        let country = self.country.as_deref().filter(|c| !c.is_empty())?;

        match self.region.as_deref().filter(|r| !r.is_empty()) {
            Some(region) => Some(format!("{}, {}", country, region)),
            None => Some(country.to_string()),
        }
    }
}

/// Best-effort IP geolocation.
///
/// Implementations must not fail: every error (timeout, network, malformed
/// response) is reported as `None`. Callers still bound each call with their
/// own timeout.
///
/// # Implementations
///
/// - [`crate::infrastructure::geo::IpApiGeoLookup`] - ip-api.com style JSON endpoint
/// - [`crate::infrastructure::geo::NullGeoLookup`] - lookups disabled
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeoLookup: Send + Sync {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo>;

    /// Short provider name for health reporting.
    fn name(&self) -> &'static str;
}
