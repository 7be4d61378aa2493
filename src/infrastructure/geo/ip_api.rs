//! HTTP geolocation against an ip-api.com compatible endpoint.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{trace, warn};

use super::service::{GeoInfo, GeoLookup};

/// Default endpoint template; `{ip}` is replaced with the client address.
pub const DEFAULT_GEO_LOOKUP_URL: &str =
    "http://ip-api.com/json/{ip}?fields=status,country,regionName";

/// Response shape of ip-api.com (`fields=status,country,regionName`).
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: Option<String>,
    country: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
}

impl IpApiResponse {
    fn into_geo_info(self) -> Option<GeoInfo> {
        if self.status.as_deref() == Some("fail") {
            return None;
        }

        Some(GeoInfo {
            country: self.country,
            region: self.region_name,
        })
    }
}

/// Geolocation through an external JSON API.
///
/// Each request is bounded by the client timeout. Failures are logged and
/// reported as `None`.
pub struct IpApiGeoLookup {
    client: Client,
    url_template: String,
}

impl IpApiGeoLookup {
    /// Creates a provider for `url_template` (must contain `{ip}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url_template: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url_template: url_template.to_string(),
        })
    }

    fn url_for(&self, ip: &IpAddr) -> String {
        self.url_template.replace("{ip}", &ip.to_string())
    }
}

#[async_trait]
impl GeoLookup for IpApiGeoLookup {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        // Only well-formed addresses reach the URL.
        let addr: IpAddr = ip.parse().ok()?;
        let url = self.url_for(&addr);

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Geo lookup request to \"{}\" failed: {}", url, e);
                return None;
            }
        };

        let body: IpApiResponse = match response.error_for_status() {
            Ok(r) => match r.json().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Geo lookup response from \"{}\" unreadable: {}", url, e);
                    return None;
                }
            },
            Err(e) => {
                warn!("Geo lookup to \"{}\" returned an error status: {}", url, e);
                return None;
            }
        };

        let info = body.into_geo_info();
        trace!("Geo lookup for {}: {:?}", ip, info);
        info
    }

    fn name(&self) -> &'static str {
        "ip-api"
    }
}
