//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorturls`             - Create a short URL
//! - `GET  /shorturls/{shortcode}` - Statistics
//! - `GET  /{shortcode}`           - Redirect
//! - `GET  /_health`               - Health check
//! - anything else                 - `404 {"error": "Route not found"}`
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Request audit** - One `route` audit record per request
//! - **Catch panic** - Panics become `500 {"error": "Internal server error"}`
//!
//! Trailing slash normalization wraps the router in [`crate::server`].

use std::any::Any;

use crate::api;
use crate::api::handlers::{health_handler, route_not_found_handler};
use crate::api::middleware::{request_audit, tracing};
use crate::error::AppError;
use crate::state::AppState;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::catch_panic::CatchPanicLayer;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(api::routes::shorturl_routes())
        .route("/_health", get(health_handler))
        .fallback(route_not_found_handler)
        .method_not_allowed_fallback(route_not_found_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_audit::layer,
        ))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(tracing::layer())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    AppError::internal(format!("Handler panicked: {}", detail)).into_response()
}
