//! Short URL API routes.

use crate::api::handlers::{create_short_url_handler, redirect_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Shortener endpoints.
///
/// # Endpoints
///
/// - `POST /shorturls`             - Create a short URL
/// - `GET  /shorturls/{shortcode}` - Statistics for a shortcode
/// - `GET  /{shortcode}`           - Redirect to the original URL
pub fn shorturl_routes() -> Router<AppState> {
    Router::new()
        .route("/shorturls", post(create_short_url_handler))
        .route("/shorturls/{shortcode}", get(stats_handler))
        .route("/{shortcode}", get(redirect_handler))
}
