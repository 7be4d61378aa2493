//! Handler for per-shortcode statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatisticsResponse;
use crate::error::AppError;
use crate::infrastructure::audit::Package;
use crate::state::AppState;
use crate::utils::code_generator::validate_shortcode;

/// Returns link metadata and the full click history.
///
/// # Endpoint
///
/// `GET /shorturls/{shortcode}`
///
/// Statistics stay available after the link expires.
///
/// # Errors
///
/// - `400` malformed shortcode
/// - `404` shortcode never issued
pub async fn stats_handler(
    Path(shortcode): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatisticsResponse>, AppError> {
    state.audit.info(
        Package::Handler,
        format!("GET /shorturls/{} - Getting statistics", shortcode),
    );

    if let Err(e) = validate_shortcode(&shortcode) {
        state.audit.error(
            Package::Handler,
            format!("Invalid shortcode format: {}", shortcode),
        );
        return Err(e);
    }

    match state.shortener.get_statistics(&shortcode).await {
        Ok(stats) => {
            state.audit.info(
                Package::Handler,
                format!("Statistics retrieved successfully for: {}", shortcode),
            );
            Ok(Json(StatisticsResponse::from(stats)))
        }
        Err(e) => {
            state
                .audit
                .error(Package::Handler, format!("Error getting statistics: {}", e));
            Err(e)
        }
    }
}
