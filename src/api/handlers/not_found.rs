//! Fallback for unmatched routes.

use axum::{extract::State, http::Uri};

use crate::error::AppError;
use crate::infrastructure::audit::Package;
use crate::state::AppState;

/// Answers every unmatched path (and unsupported method) with
/// `404 {"error": "Route not found"}`.
pub async fn route_not_found_handler(State(state): State<AppState>, uri: Uri) -> AppError {
    state.audit.warn(
        Package::Handler,
        format!("404 - Route not found: {}", uri),
    );

    AppError::RouteNotFound {
        path: uri.path().to_string(),
    }
}
