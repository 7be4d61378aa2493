//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::ShortenerService;
use crate::infrastructure::audit::AuditLogger;
use crate::infrastructure::persistence::InMemoryLinkRepository;

/// Cheap-to-clone handle on the running service.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService<InMemoryLinkRepository>>,
    pub audit: AuditLogger,
    /// Take the client IP from `X-Forwarded-For` / `X-Real-IP`.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(
        shortener: Arc<ShortenerService<InMemoryLinkRepository>>,
        audit: AuditLogger,
        behind_proxy: bool,
    ) -> Self {
        Self {
            shortener,
            audit,
            behind_proxy,
        }
    }
}
