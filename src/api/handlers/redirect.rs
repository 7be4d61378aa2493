//! Handler for short URL redirect.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::domain::RequestContext;
use crate::error::AppError;
use crate::infrastructure::audit::Package;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;
use crate::utils::code_generator::validate_shortcode;
use crate::utils::url_validator::parse_url;

/// Redirects a shortcode to its original URL and records the click.
///
/// # Endpoint
///
/// `GET /{shortcode}`
///
/// # Click Tracking
///
/// The click (timestamp, referrer, coarse location, IP) is stored before the
/// response is sent. Geolocation failures never affect the redirect.
///
/// # Errors
///
/// - `400` malformed shortcode
/// - `404` unknown shortcode
/// - `410` expired link
pub async fn redirect_handler(
    Path(shortcode): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    state.audit.info(
        Package::Handler,
        format!("GET /{} - Redirecting to original URL", shortcode),
    );

    if let Err(e) = validate_shortcode(&shortcode) {
        state.audit.error(
            Package::Handler,
            format!("Invalid shortcode format: {}", shortcode),
        );
        return Err(e);
    }

    let ctx = request_context(&headers, addr, state.behind_proxy);

    match state.shortener.resolve(&shortcode, &ctx).await {
        Ok(original_url) => {
            state.audit.info(
                Package::Handler,
                format!("Redirecting {} to {}", shortcode, original_url),
            );
            found(&original_url)
        }
        Err(e) => {
            state
                .audit
                .error(Package::Handler, format!("Error redirecting: {}", e));
            Err(e)
        }
    }
}

fn request_context(headers: &HeaderMap, addr: SocketAddr, behind_proxy: bool) -> RequestContext {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    RequestContext {
        ip: Some(client_ip(headers, Some(addr), behind_proxy)),
        referrer: header_str("referrer"),
        referer: header_str(header::REFERER.as_str()),
        user_agent: header_str(header::USER_AGENT.as_str()),
    }
}

/// `302 Found` to `url`.
///
/// URLs that are not valid header values as stored (non-ASCII) are sent in
/// their percent-encoded form.
fn found(url: &str) -> Result<Response, AppError> {
    let location = match HeaderValue::from_str(url) {
        Ok(value) => value,
        Err(_) => {
            let encoded = parse_url(url)?;
            HeaderValue::from_str(encoded.as_str())
                .map_err(|e| AppError::internal(format!("Unusable redirect target: {}", e)))?
        }
    };

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
