//! Repository trait for shortcode storage and click history.

use crate::domain::entities::{Click, Link, NewClick, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// A link together with its full click history.
#[derive(Debug, Clone)]
pub struct LinkStats {
    pub link: Link,
    pub total_clicks: u64,
    /// Clicks in arrival order.
    pub clicks: Vec<Click>,
}

/// Repository interface for links and their click statistics.
///
/// A link and its statistics are created together and never deleted. Both
/// mutating operations are atomic per code: `insert` stores the link and a
/// zeroed history as one step, and `append_click` bumps the counter and
/// appends the record as one step.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Stores a new link if its code is free.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ShortcodeConflict`] if the code was ever issued.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by exact (case-sensitive) code, expired or not.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Returns true if the code has been issued.
    async fn exists(&self, code: &str) -> Result<bool, AppError>;

    /// Records one click against a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code was never issued.
    async fn append_click(&self, code: &str, new_click: NewClick) -> Result<Click, AppError>;

    /// Returns the link and a snapshot of its click history.
    async fn get_stats(&self, code: &str) -> Result<Option<LinkStats>, AppError>;

    /// Number of issued codes.
    async fn count(&self) -> Result<usize, AppError>;
}
