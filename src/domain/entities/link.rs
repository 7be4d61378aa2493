//! Link entity representing a shortcode mapping.

use chrono::{DateTime, Duration, Utc};

/// Validity applied when the caller does not supply one, in minutes.
pub const DEFAULT_VALIDITY_MINUTES: u32 = 30;

/// A shortened URL with its lifetime.
///
/// All fields are fixed at creation. Expiry is evaluated at read time: an
/// expired link stays in the store for statistics but no longer redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    /// Lifetime in minutes.
    pub validity_minutes: u32,
    pub expires_at: DateTime<Utc>,
}

impl Link {
    /// Returns true if the link can no longer be resolved at `now`.
    ///
    /// A link is resolvable strictly before `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Input data for storing a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub validity_minutes: u32,
    pub expires_at: DateTime<Utc>,
}

impl NewLink {
    /// Builds a link starting at `created_at` and valid for `validity_minutes`.
    ///
    /// Returns `None` if the expiry falls outside the representable range.
    pub fn starting_at(
        code: String,
        original_url: String,
        validity_minutes: u32,
        created_at: DateTime<Utc>,
    ) -> Option<Self> {
        let expires_at =
            created_at.checked_add_signed(Duration::minutes(i64::from(validity_minutes)))?;

        Some(Self {
            code,
            original_url,
            created_at,
            validity_minutes,
            expires_at,
        })
    }
}

impl From<NewLink> for Link {
    fn from(new_link: NewLink) -> Self {
        Self {
            code: new_link.code,
            original_url: new_link.original_url,
            created_at: new_link.created_at,
            validity_minutes: new_link.validity_minutes,
            expires_at: new_link.expires_at,
        }
    }
}
