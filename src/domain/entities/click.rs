//! Click entities: single redirect events and the per-link aggregate.

use chrono::{DateTime, Utc};

/// Referrer recorded when the request carries none.
pub const DIRECT_REFERRER: &str = "direct";

/// Location recorded for loopback or unknown clients.
pub const LOCAL_LOCATION: &str = "Local";

/// Location recorded when geolocation fails or yields no country.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// One observed redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Click {
    /// 1-based position in the link's click history.
    pub sequence: u64,
    pub clicked_at: DateTime<Utc>,
    pub referrer: String,
    pub location: String,
    pub ip: String,
}

/// Input data for recording a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
    pub clicked_at: DateTime<Utc>,
    pub referrer: String,
    pub location: String,
    pub ip: String,
}

/// Append-only click history of one link.
///
/// The counter and the history only change together through
/// [`ClickStats::record`], so `total_clicks() == clicks().len()` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickStats {
    total_clicks: u64,
    clicks: Vec<Click>,
}

impl ClickStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a click and bumps the counter. Returns the stored record.
    pub fn record(&mut self, new_click: NewClick) -> Click {
        self.total_clicks += 1;

        let click = Click {
            sequence: self.total_clicks,
            clicked_at: new_click.clicked_at,
            referrer: new_click.referrer,
            location: new_click.location,
            ip: new_click.ip,
        };
        self.clicks.push(click.clone());
        click
    }

    pub fn total_clicks(&self) -> u64 {
        self.total_clicks
    }

    /// Clicks in arrival order.
    pub fn clicks(&self) -> &[Click] {
        &self.clicks
    }
}
