//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /_health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Store**: number of issued codes
/// 2. **Geo lookup**: configured provider
/// 3. **Audit**: remote sink worker alive, or console-only mode
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok", "message": "12 links" },
///     "geo_lookup": { "status": "ok", "message": "Provider: ip-api" },
///     "audit": { "status": "ok", "message": "Console only" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = check_store(&state).await;
    let geo_check = CheckStatus::ok(format!("Provider: {}", state.shortener.geo_provider()));
    let audit_check = check_audit(&state);

    let all_healthy = store_check.is_ok() && geo_check.is_ok() && audit_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            store: store_check,
            geo_lookup: geo_check,
            audit: audit_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_store(state: &AppState) -> CheckStatus {
    match state.shortener.link_count().await {
        Ok(count) => CheckStatus::ok(format!("{} links", count)),
        Err(e) => CheckStatus::error(format!("Store error: {}", e)),
    }
}

/// The audit worker stopping is the only failure; console-only is healthy.
fn check_audit(state: &AppState) -> CheckStatus {
    if !state.audit.is_enabled() {
        CheckStatus::ok("Console only")
    } else if state.audit.is_closed() {
        CheckStatus::error("Audit worker stopped")
    } else {
        CheckStatus::ok("Remote sink")
    }
}
