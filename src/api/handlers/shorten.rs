//! Handler for short URL creation.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{CreateShortUrlRequest, CreateShortUrlResponse};
use crate::error::AppError;
use crate::infrastructure::audit::Package;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /shorturls`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com", "validity": 30, "shortcode": "abc123" }
/// ```
///
/// `validity` is in minutes (default 30). `shortcode` is optional.
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "shortLink": "http://localhost:3000/abc123", "expiry": "2025-01-01T00:30:00.000Z" }
/// ```
///
/// # Errors
///
/// - `400` missing url, bad validity, malformed URL or shortcode, bad JSON
/// - `409` shortcode already exists
pub async fn create_short_url_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateShortUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateShortUrlResponse>), AppError> {
    state
        .audit
        .info(Package::Handler, "POST /shorturls - Creating short URL");

    match create(&state, payload).await {
        Ok(response) => {
            state.audit.info(
                Package::Handler,
                format!("Short URL created successfully: {}", response.short_link),
            );
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(e) => {
            state
                .audit
                .error(Package::Handler, format!("Error creating short URL: {}", e));
            Err(e)
        }
    }
}

async fn create(
    state: &AppState,
    payload: Result<Json<CreateShortUrlRequest>, JsonRejection>,
) -> Result<CreateShortUrlResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let validity = payload
        .validity
        .map(|minutes| {
            u32::try_from(minutes).map_err(|_| {
                AppError::invalid_request("Validity is too large", json!({ "validity": minutes }))
            })
        })
        .transpose()?;

    // `validate` guarantees presence.
    let url = payload.url.as_deref().unwrap_or_default();

    let created = state
        .shortener
        .create(url, validity, payload.requested_code())
        .await?;

    Ok(CreateShortUrlResponse {
        short_link: created.short_link,
        expiry: created.link.expires_at,
    })
}
