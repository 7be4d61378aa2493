//! DTOs for click records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Click;
use crate::utils::timestamp::serialize_millis;

/// One click as reported in statistics.
#[derive(Debug, Serialize)]
pub struct ClickInfo {
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,
    pub referrer: String,
    pub location: String,
    pub ip: String,
}

impl From<Click> for ClickInfo {
    fn from(click: Click) -> Self {
        Self {
            timestamp: click.clicked_at,
            referrer: click.referrer,
            location: click.location,
            ip: click.ip,
        }
    }
}
