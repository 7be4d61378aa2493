//! Shortcode generation and validation utilities.
//!
//! Generated codes are 6 characters drawn uniformly from `[A-Za-z0-9]`
//! (62^6 ≈ 5.7e10 codes). User-supplied codes must match `^[A-Za-z0-9]{3,20}$`.

use crate::error::AppError;
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// Alphabet used for generated codes.
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of randomly generated codes.
pub const GENERATED_CODE_LENGTH: usize = 6;

/// Codes that collide with paths owned by the router.
pub const RESERVED_CODES: &[&str] = &["shorturls"];

static SHORTCODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{3,20}$").expect("shortcode regex is valid"));

/// Generates a random 6-character alphanumeric shortcode.
///
/// Uniqueness is not checked here; callers insert-if-absent and retry.
pub fn generate_shortcode() -> String {
    let mut rng = rand::rng();

    (0..GENERATED_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Returns true if `code` is 3-20 ASCII letters or digits.
pub fn is_valid_shortcode(code: &str) -> bool {
    SHORTCODE_REGEX.is_match(code)
}

/// Returns true if `code` is owned by the router and cannot be issued.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Validates shortcode syntax.
///
/// # Errors
///
/// Returns [`AppError::InvalidShortcodeFormat`] when the code does not match
/// `^[A-Za-z0-9]{3,20}$`.
pub fn validate_shortcode(code: &str) -> Result<(), AppError> {
    if is_valid_shortcode(code) {
        Ok(())
    } else {
        Err(AppError::InvalidShortcodeFormat {
            shortcode: code.to_string(),
        })
    }
}
