//! HTTP server initialization and runtime setup.
//!
//! Builds the store, outbound collaborators and service, then runs the Axum
//! server until a shutdown signal arrives.

use crate::application::services::{ShortenerService, ShortenerSettings};
use crate::config::Config;
use crate::infrastructure::audit::{AuditLogger, HttpAuditSink, Package};
use crate::infrastructure::geo::{GeoLookup, IpApiGeoLookup, NullGeoLookup};
use crate::infrastructure::persistence::InMemoryLinkRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

/// Builds application state from configuration.
///
/// Must be called inside a Tokio runtime when an audit sink is configured,
/// since the audit worker is spawned here.
///
/// # Errors
///
/// Returns an error if an outbound HTTP client cannot be built.
pub fn build_state(config: &Config) -> Result<AppState> {
    let audit = match &config.audit_log_url {
        Some(url) => {
            let sink = HttpAuditSink::new(url, config.audit_timeout())
                .context("Failed to build audit HTTP client")?;
            tracing::info!("Audit sink enabled");
            AuditLogger::spawn(Arc::new(sink), config.audit_queue_capacity)
        }
        None => {
            tracing::info!("Audit sink disabled (console only)");
            AuditLogger::disabled()
        }
    };

    let geo: Arc<dyn GeoLookup> = if config.geo_lookup_enabled {
        let lookup = IpApiGeoLookup::new(&config.geo_lookup_url, config.geo_lookup_timeout())
            .context("Failed to build geo lookup HTTP client")?;
        Arc::new(lookup)
    } else {
        tracing::info!("Geo lookup disabled");
        Arc::new(NullGeoLookup::new())
    };

    let repository = Arc::new(InMemoryLinkRepository::new());
    let shortener = Arc::new(ShortenerService::new(
        repository,
        geo,
        audit.clone(),
        ShortenerSettings {
            base_url: config.base_url.clone(),
            max_code_attempts: config.shortcode_max_attempts,
            geo_timeout: config.geo_lookup_timeout(),
        },
    ));

    Ok(AppState::new(shortener, audit, config.behind_proxy))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Audit logger (remote sink worker or console only)
/// - Geo lookup provider
/// - In-memory store and shortener service
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - An HTTP client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config)?;
    let audit = state.audit.clone();

    let app = NormalizePathLayer::trim_trailing_slash().layer(app_router(state));

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{addr}");
    audit.info(
        Package::Service,
        format!("URL Shortener Microservice started on {}", addr),
    );

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
