//! Structural URL validation.
//!
//! Only checks that the input parses as an absolute URL. No reachability
//! probe and no scheme allow-list beyond what the parser accepts.

use crate::error::AppError;
use url::Url;

/// Returns true if `input` parses as an absolute URL.
pub fn is_valid_url(input: &str) -> bool {
    Url::parse(input).is_ok()
}

/// Parses `input` as an absolute URL.
///
/// # Errors
///
/// Returns [`AppError::InvalidUrl`] with the parser's reason on failure.
pub fn parse_url(input: &str) -> Result<Url, AppError> {
    Url::parse(input).map_err(|e| AppError::InvalidUrl {
        url: input.to_string(),
        reason: e.to_string(),
    })
}
