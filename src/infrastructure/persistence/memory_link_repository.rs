//! In-memory implementation of the link repository.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{Click, ClickStats, Link, NewClick, NewLink};
use crate::domain::repositories::{LinkRepository, LinkStats};
use crate::error::AppError;

/// A link and its click history, stored under one key.
///
/// Keeping both in a single map entry means each mutation happens under the
/// entry's shard lock, so the link/stats pair is created atomically and the
/// counter/history pair is updated atomically.
#[derive(Debug)]
struct LinkEntry {
    link: Link,
    stats: ClickStats,
}

/// Process-local store owned by the service instance.
///
/// Nothing survives a restart. Entries are never evicted; expiry is a read-time
/// check in the service layer.
#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    entries: DashMap<String, LinkEntry>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        match self.entries.entry(new_link.code.clone()) {
            Entry::Occupied(_) => Err(AppError::ShortcodeConflict {
                shortcode: new_link.code,
            }),
            Entry::Vacant(slot) => {
                let link = Link::from(new_link);
                slot.insert(LinkEntry {
                    link: link.clone(),
                    stats: ClickStats::new(),
                });
                Ok(link)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.entries.get(code).map(|entry| entry.link.clone()))
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.entries.contains_key(code))
    }

    async fn append_click(&self, code: &str, new_click: NewClick) -> Result<Click, AppError> {
        let mut entry = self
            .entries
            .get_mut(code)
            .ok_or_else(|| AppError::NotFound {
                shortcode: code.to_string(),
            })?;

        Ok(entry.stats.record(new_click))
    }

    async fn get_stats(&self, code: &str) -> Result<Option<LinkStats>, AppError> {
        Ok(self.entries.get(code).map(|entry| LinkStats {
            link: entry.link.clone(),
            total_clicks: entry.stats.total_clicks(),
            clicks: entry.stats.clicks().to_vec(),
        }))
    }

    async fn count(&self) -> Result<usize, AppError> {
        Ok(self.entries.len())
    }
}
