//! DTOs for per-shortcode statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::clicks::ClickInfo;
use crate::domain::repositories::LinkStats;
use crate::utils::timestamp::serialize_millis;

/// Response body of `GET /shorturls/{shortcode}`.
///
/// Available for expired links too. `validity` is in minutes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub shortcode: String,
    pub original_url: String,
    pub total_clicks: u64,
    #[serde(serialize_with = "serialize_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_millis")]
    pub expiry_time: DateTime<Utc>,
    pub validity: u32,
    pub clicks: Vec<ClickInfo>,
}

impl From<LinkStats> for StatisticsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            shortcode: stats.link.code,
            original_url: stats.link.original_url,
            total_clicks: stats.total_clicks,
            created_at: stats.link.created_at,
            expiry_time: stats.link.expires_at,
            validity: stats.link.validity_minutes,
            clicks: stats.clicks.into_iter().map(ClickInfo::from).collect(),
        }
    }
}
