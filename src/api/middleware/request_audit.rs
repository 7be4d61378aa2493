//! Emits one `route` audit record per incoming request.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::infrastructure::audit::Package;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Records `"{METHOD} {path} - {ip}"` and passes the request on.
///
/// Never rejects: audit submission is non-blocking and infallible.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/{shortcode}", get(redirect_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), request_audit::layer));
/// ```
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = client_ip(req.headers(), peer, st.behind_proxy);

    st.audit.info(
        Package::Route,
        format!("{} {} - {}", req.method(), req.uri().path(), ip),
    );

    next.run(req).await
}
