//! DTOs for the short URL creation endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use validator::Validate;

use crate::utils::timestamp::serialize_millis;

/// Request body of `POST /shorturls`.
///
/// ```json
/// { "url": "https://example.com", "validity": 30, "shortcode": "abc123" }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct CreateShortUrlRequest {
    /// Destination; must parse as an absolute URL.
    #[validate(
        required(message = "Missing required field: url"),
        length(min = 1, message = "Missing required field: url")
    )]
    pub url: Option<String>,

    /// Lifetime in minutes. Absent or `null` means 30. `5.0` counts as `5`.
    #[serde(default, deserialize_with = "deserialize_whole_number")]
    #[validate(range(min = 1, message = "Validity must be a positive integer"))]
    pub validity: Option<i64>,

    /// Optional custom code, 3-20 ASCII letters or digits. Empty means absent.
    pub shortcode: Option<String>,
}

impl CreateShortUrlRequest {
    /// The requested code, with an empty string treated as not supplied.
    pub fn requested_code(&self) -> Option<&str> {
        self.shortcode.as_deref().filter(|code| !code.is_empty())
    }
}

/// Accepts any JSON number without a fractional part.
fn deserialize_whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Some(value) = number.as_i64() {
        return Ok(Some(value));
    }

    match number.as_f64() {
        Some(value) if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 => {
            Ok(Some(value as i64))
        }
        _ => Err(de::Error::invalid_value(
            de::Unexpected::Other(&number.to_string()),
            &"a whole number",
        )),
    }
}

/// Response body of a successful create (`201 Created`).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShortUrlResponse {
    pub short_link: String,
    #[serde(serialize_with = "serialize_millis")]
    pub expiry: DateTime<Utc>,
}
