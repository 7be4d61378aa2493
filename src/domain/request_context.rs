//! Per-request metadata consumed by click recording.

use crate::domain::entities::DIRECT_REFERRER;
use crate::utils::client_ip::UNKNOWN_IP;

/// Client information captured from a redirect request.
///
/// Both spellings of the referrer header are carried; `referrer` wins when
/// both are present. `user_agent` is captured but not recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub ip: Option<String>,
    pub referrer: Option<String>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestContext {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: Some(ip.into()),
            ..Self::default()
        }
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Client address, or `"unknown"` when unavailable.
    pub fn source_ip(&self) -> &str {
        non_empty(&self.ip).unwrap_or(UNKNOWN_IP)
    }

    /// Referrer, or `"direct"` when neither header was sent.
    pub fn referrer(&self) -> &str {
        non_empty(&self.referrer)
            .or_else(|| non_empty(&self.referer))
            .unwrap_or(DIRECT_REFERRER)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
