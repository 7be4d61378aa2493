//! Shortcode issuance, resolution and click analytics.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::RequestContext;
use crate::domain::entities::{
    Click, DEFAULT_VALIDITY_MINUTES, LOCAL_LOCATION, Link, NewClick, NewLink, UNKNOWN_LOCATION,
};
use crate::domain::repositories::{LinkRepository, LinkStats};
use crate::error::AppError;
use crate::infrastructure::audit::{AuditLogger, Package};
use crate::infrastructure::geo::GeoLookup;
use crate::utils::client_ip::is_local_address;
use crate::utils::code_generator::{generate_shortcode, is_reserved, validate_shortcode};
use crate::utils::url_validator::parse_url;

/// Tunables for [`ShortenerService`].
#[derive(Debug, Clone)]
pub struct ShortenerSettings {
    /// Prefix of every issued short link, without a trailing slash.
    pub base_url: String,
    /// Random codes tried before giving up with `CodespaceExhausted`.
    pub max_code_attempts: usize,
    /// Upper bound for one geolocation lookup.
    pub geo_timeout: Duration,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            max_code_attempts: 10,
            geo_timeout: Duration::from_secs(5),
        }
    }
}

/// Result of a successful [`ShortenerService::create`].
#[derive(Debug, Clone)]
pub struct CreatedShortLink {
    pub link: Link,
    /// Fully qualified short URL (`base_url/code`).
    pub short_link: String,
}

/// Owns the shortcode lifecycle: create, resolve (with click recording) and
/// statistics.
///
/// The store is injected, so independent instances never share state.
pub struct ShortenerService<R: LinkRepository> {
    repository: Arc<R>,
    geo: Arc<dyn GeoLookup>,
    audit: AuditLogger,
    settings: ShortenerSettings,
}

impl<R: LinkRepository> ShortenerService<R> {
    pub fn new(
        repository: Arc<R>,
        geo: Arc<dyn GeoLookup>,
        audit: AuditLogger,
        settings: ShortenerSettings,
    ) -> Self {
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        audit.info(Package::Service, "URL Shortener Service initialized");

        Self {
            repository,
            geo,
            audit,
            settings: ShortenerSettings {
                base_url,
                ..settings
            },
        }
    }

    /// Issues a new shortcode for `original_url`.
    ///
    /// `validity_minutes` defaults to 30 when `None`. A `requested_code` is
    /// used verbatim if it is well-formed and free; otherwise a random
    /// 6-character code is generated.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if the URL does not parse
    /// - [`AppError::InvalidRequest`] if the validity is zero or too large
    /// - [`AppError::InvalidShortcodeFormat`] for a malformed custom code
    /// - [`AppError::ShortcodeConflict`] if the custom code is taken or reserved
    /// - [`AppError::CodespaceExhausted`] if every random attempt collided
    pub async fn create(
        &self,
        original_url: &str,
        validity_minutes: Option<u32>,
        requested_code: Option<&str>,
    ) -> Result<CreatedShortLink, AppError> {
        self.audit.info(
            Package::Service,
            format!("Creating short URL for: {}", original_url),
        );

        match self
            .create_inner(original_url, validity_minutes, requested_code)
            .await
        {
            Ok(link) => {
                self.audit.info(
                    Package::Service,
                    format!("Short URL created successfully: {}", link.code),
                );
                Ok(CreatedShortLink {
                    short_link: self.short_link_for(&link.code),
                    link,
                })
            }
            Err(e) => {
                self.audit.error(
                    Package::Service,
                    format!("Failed to create short URL for {}: {}", original_url, e),
                );
                Err(e)
            }
        }
    }

    async fn create_inner(
        &self,
        original_url: &str,
        validity_minutes: Option<u32>,
        requested_code: Option<&str>,
    ) -> Result<Link, AppError> {
        parse_url(original_url)?;

        let validity = validity_minutes.unwrap_or(DEFAULT_VALIDITY_MINUTES);
        if validity == 0 {
            return Err(AppError::invalid_request(
                "Validity must be a positive integer",
                json!({ "validity": validity }),
            ));
        }

        match requested_code {
            Some(code) => {
                validate_shortcode(code)?;
                if is_reserved(code) {
                    return Err(AppError::ShortcodeConflict {
                        shortcode: code.to_string(),
                    });
                }

                let new_link = self.new_link(code.to_string(), original_url, validity)?;
                self.repository.insert(new_link).await
            }
            None => self.insert_generated(original_url, validity).await,
        }
    }

    /// Tries random codes until one inserts or the attempt budget runs out.
    ///
    /// The insert is the uniqueness check, so two concurrent creates can never
    /// both claim the same code.
    async fn insert_generated(&self, original_url: &str, validity: u32) -> Result<Link, AppError> {
        let attempts = self.settings.max_code_attempts;

        for attempt in 1..=attempts {
            let code = generate_shortcode();
            let new_link = self.new_link(code, original_url, validity)?;

            match self.repository.insert(new_link).await {
                Ok(link) => return Ok(link),
                Err(AppError::ShortcodeConflict { shortcode }) => {
                    debug!("Generated code {} collided (attempt {})", shortcode, attempt);
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::CodespaceExhausted { attempts })
    }

    fn new_link(&self, code: String, original_url: &str, validity: u32) -> Result<NewLink, AppError> {
        NewLink::starting_at(code, original_url.to_string(), validity, Utc::now()).ok_or_else(|| {
            AppError::invalid_request(
                "Validity is too large",
                json!({ "validity": validity }),
            )
        })
    }

    /// Resolves a shortcode to its destination and records the click.
    ///
    /// The click is stored before this returns, so a statistics call issued
    /// after the redirect always sees it.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code was never issued
    /// - [`AppError::Expired`] if the link is past its expiry
    pub async fn resolve(&self, code: &str, ctx: &RequestContext) -> Result<String, AppError> {
        self.audit
            .info(Package::Service, format!("Looking up shortcode: {}", code));

        let Some(link) = self.repository.find_by_code(code).await? else {
            self.audit
                .error(Package::Service, format!("Shortcode not found: {}", code));
            return Err(AppError::NotFound {
                shortcode: code.to_string(),
            });
        };

        if link.is_expired_at(Utc::now()) {
            self.audit
                .warn(Package::Service, format!("Short URL expired: {}", code));
            return Err(AppError::Expired {
                shortcode: link.code,
                expired_at: link.expires_at,
            });
        }

        if let Err(e) = self.record_click(code, ctx).await {
            warn!("Failed to record click for {}: {}", code, e);
            self.audit.error(
                Package::Service,
                format!("Failed to record click for {}: {}", code, e),
            );
        }

        self.audit.info(
            Package::Service,
            format!("Redirecting {} to {}", code, link.original_url),
        );

        Ok(link.original_url)
    }

    /// Appends one click for `code`.
    ///
    /// The timestamp is taken on arrival; geolocation runs without touching
    /// the store, which is only entered for the final append.
    async fn record_click(&self, code: &str, ctx: &RequestContext) -> Result<Click, AppError> {
        let clicked_at = Utc::now();
        let ip = ctx.source_ip().to_string();
        let location = self.coarse_location(&ip).await;

        let click = self
            .repository
            .append_click(
                code,
                NewClick {
                    clicked_at,
                    referrer: ctx.referrer().to_string(),
                    location,
                    ip,
                },
            )
            .await?;

        debug!(
            "Click #{} recorded for {} from {} ({})",
            click.sequence, code, click.ip, click.location
        );

        Ok(click)
    }

    /// Maps a client IP to `"Local"`, `"Country"`, `"Country, Region"` or
    /// `"Unknown"`. Never fails.
    async fn coarse_location(&self, ip: &str) -> String {
        if is_local_address(ip) {
            return LOCAL_LOCATION.to_string();
        }

        match tokio::time::timeout(self.settings.geo_timeout, self.geo.lookup(ip)).await {
            Ok(Some(info)) => info
                .describe()
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            Ok(None) => UNKNOWN_LOCATION.to_string(),
            Err(_) => {
                warn!(
                    "Geo lookup for {} exceeded {:?}",
                    ip, self.settings.geo_timeout
                );
                UNKNOWN_LOCATION.to_string()
            }
        }
    }

    /// Returns a link with its full click history, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code was never issued.
    pub async fn get_statistics(&self, code: &str) -> Result<LinkStats, AppError> {
        self.audit.info(
            Package::Service,
            format!("Getting statistics for shortcode: {}", code),
        );

        self.repository.get_stats(code).await?.ok_or_else(|| {
            self.audit.error(
                Package::Service,
                format!("Shortcode not found for statistics: {}", code),
            );
            AppError::NotFound {
                shortcode: code.to_string(),
            }
        })
    }

    /// Returns true if `code` has never been issued.
    pub async fn is_unique(&self, code: &str) -> Result<bool, AppError> {
        Ok(!self.repository.exists(code).await?)
    }

    /// Number of issued codes.
    pub async fn link_count(&self) -> Result<usize, AppError> {
        self.repository.count().await
    }

    pub fn short_link_for(&self, code: &str) -> String {
        format!("{}/{}", self.settings.base_url, code)
    }

    /// Name of the configured geolocation provider.
    pub fn geo_provider(&self) -> &'static str {
        self.geo.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::geo::{GeoInfo, MockGeoLookup, NullGeoLookup};
    use crate::infrastructure::persistence::InMemoryLinkRepository;
    use crate::utils::code_generator::is_valid_shortcode;
    use chrono::Duration as ChronoDuration;

    fn settings() -> ShortenerSettings {
        ShortenerSettings {
            base_url: "http://short.test/".to_string(),
            max_code_attempts: 5,
            geo_timeout: Duration::from_millis(200),
        }
    }

    fn service_with_geo(geo: impl GeoLookup + 'static) -> ShortenerService<InMemoryLinkRepository> {
        ShortenerService::new(
            Arc::new(InMemoryLinkRepository::new()),
            Arc::new(geo),
            AuditLogger::disabled(),
            settings(),
        )
    }

    fn service() -> ShortenerService<InMemoryLinkRepository> {
        service_with_geo(NullGeoLookup::new())
    }

    fn local_ctx() -> RequestContext {
        RequestContext::new("127.0.0.1")
    }

    #[tokio::test]
    async fn test_create_generates_valid_code_and_resolves() {
        let service = service();

        let created = service
            .create("https://example.com", None, None)
            .await
            .unwrap();

        assert!(is_valid_shortcode(&created.link.code));
        assert_eq!(created.link.code.len(), 6);
        assert_eq!(
            created.short_link,
            format!("http://short.test/{}", created.link.code)
        );
        assert_eq!(created.link.validity_minutes, 30);
        assert_eq!(
            created.link.expires_at - created.link.created_at,
            ChronoDuration::minutes(30)
        );

        let url = service
            .resolve(&created.link.code, &local_ctx())
            .await
            .unwrap();
        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_url() {
        let result = service().create("not a url", None, None).await;
        assert!(matches!(result, Err(AppError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_create_rejects_zero_validity() {
        let result = service()
            .create("https://example.com", Some(0), None)
            .await;
        assert!(matches!(result, Err(AppError::InvalidRequest { .. })));
    }

    #[tokio::test]
    async fn test_custom_code_conflict() {
        let service = service();

        service
            .create("https://example.com", None, Some("abc123"))
            .await
            .unwrap();

        let second = service
            .create("https://other.example", None, Some("abc123"))
            .await;
        assert!(matches!(second, Err(AppError::ShortcodeConflict { .. })));

        let different = service
            .create("https://other.example", None, Some("abc124"))
            .await;
        assert!(different.is_ok());
    }

    #[tokio::test]
    async fn test_custom_code_format_checked() {
        let service = service();

        for bad in ["ab", "has-dash", "way_too_long_for_a_shortcode"] {
            let result = service.create("https://example.com", None, Some(bad)).await;
            assert!(
                matches!(result, Err(AppError::InvalidShortcodeFormat { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_reserved_code_refused() {
        let result = service()
            .create("https://example.com", None, Some("shorturls"))
            .await;
        assert!(matches!(result, Err(AppError::ShortcodeConflict { .. })));
    }

    #[tokio::test]
    async fn test_generation_gives_up_after_bounded_attempts() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert().times(5).returning(|new_link| {
            Err(AppError::ShortcodeConflict {
                shortcode: new_link.code,
            })
        });

        let service = ShortenerService::new(
            Arc::new(repo),
            Arc::new(NullGeoLookup::new()),
            AuditLogger::disabled(),
            settings(),
        );

        let result = service.create("https://example.com", None, None).await;
        assert!(matches!(
            result,
            Err(AppError::CodespaceExhausted { attempts: 5 })
        ));
    }

    #[tokio::test]
    async fn test_generation_retries_after_collision() {
        let mut repo = MockLinkRepository::new();
        let mut calls = 0;
        repo.expect_insert().times(2).returning(move |new_link| {
            calls += 1;
            if calls == 1 {
                Err(AppError::ShortcodeConflict {
                    shortcode: new_link.code,
                })
            } else {
                Ok(Link::from(new_link))
            }
        });

        let service = ShortenerService::new(
            Arc::new(repo),
            Arc::new(NullGeoLookup::new()),
            AuditLogger::disabled(),
            settings(),
        );

        assert!(service.create("https://example.com", None, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_resolve_unknown_code() {
        let result = service().resolve("nope42", &local_ctx()).await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_resolve_expired_link_keeps_stats() {
        let repo = Arc::new(InMemoryLinkRepository::new());
        let created_at = Utc::now() - ChronoDuration::minutes(2);
        repo.insert(
            NewLink::starting_at(
                "old001".to_string(),
                "https://example.com".to_string(),
                1,
                created_at,
            )
            .unwrap(),
        )
        .await
        .unwrap();

        let service = ShortenerService::new(
            repo,
            Arc::new(NullGeoLookup::new()),
            AuditLogger::disabled(),
            settings(),
        );

        let result = service.resolve("old001", &local_ctx()).await;
        assert!(matches!(result, Err(AppError::Expired { .. })));

        let stats = service.get_statistics("old001").await.unwrap();
        assert_eq!(stats.total_clicks, 0);
        assert_eq!(stats.link.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_clicks_counted_in_order() {
        let service = service();
        let created = service
            .create("https://example.com", Some(5), None)
            .await
            .unwrap();
        let code = &created.link.code;

        for referrer in ["https://a.example", "https://b.example", "https://c.example"] {
            let ctx = local_ctx().with_referer(referrer);
            service.resolve(code, &ctx).await.unwrap();
        }

        let stats = service.get_statistics(code).await.unwrap();
        assert_eq!(stats.total_clicks, 3);
        assert_eq!(stats.clicks.len(), 3);

        let referrers: Vec<_> = stats.clicks.iter().map(|c| c.referrer.as_str()).collect();
        assert_eq!(
            referrers,
            ["https://a.example", "https://b.example", "https://c.example"]
        );
        assert!(stats.clicks.iter().all(|c| c.location == "Local"));
    }

    #[tokio::test]
    async fn test_click_defaults() {
        let service = service();
        let created = service
            .create("https://example.com", None, Some("dflt01"))
            .await
            .unwrap();

        service
            .resolve(&created.link.code, &RequestContext::default())
            .await
            .unwrap();

        let stats = service.get_statistics("dflt01").await.unwrap();
        let click = &stats.clicks[0];
        assert_eq!(click.referrer, "direct");
        assert_eq!(click.ip, "unknown");
        assert_eq!(click.location, "Local");
    }

    #[tokio::test]
    async fn test_remote_ip_uses_geo_lookup() {
        let mut geo = MockGeoLookup::new();
        geo.expect_lookup()
            .withf(|ip| ip == "8.8.8.8")
            .times(1)
            .returning(|_| {
                Some(GeoInfo {
                    country: Some("United States".to_string()),
                    region: Some("California".to_string()),
                })
            });

        let service = service_with_geo(geo);
        service
            .create("https://example.com", None, Some("geo001"))
            .await
            .unwrap();
        service
            .resolve("geo001", &RequestContext::new("8.8.8.8"))
            .await
            .unwrap();

        let stats = service.get_statistics("geo001").await.unwrap();
        assert_eq!(stats.clicks[0].location, "United States, California");
    }

    #[tokio::test]
    async fn test_loopback_skips_geo_lookup() {
        let mut geo = MockGeoLookup::new();
        geo.expect_lookup().times(0);

        let service = service_with_geo(geo);
        service
            .create("https://example.com", None, Some("loop01"))
            .await
            .unwrap();

        for ip in ["127.0.0.1", "::1", "::ffff:127.0.0.1"] {
            service
                .resolve("loop01", &RequestContext::new(ip))
                .await
                .unwrap();
        }

        let stats = service.get_statistics("loop01").await.unwrap();
        assert!(stats.clicks.iter().all(|c| c.location == "Local"));
    }

    #[tokio::test]
    async fn test_geo_failure_still_redirects() {
        let mut geo = MockGeoLookup::new();
        geo.expect_lookup().returning(|_| None);

        let service = service_with_geo(geo);
        service
            .create("https://example.com", None, Some("fail01"))
            .await
            .unwrap();

        let url = service
            .resolve("fail01", &RequestContext::new("203.0.113.7"))
            .await
            .unwrap();
        assert_eq!(url, "https://example.com");

        let stats = service.get_statistics("fail01").await.unwrap();
        assert_eq!(stats.clicks[0].location, "Unknown");
        assert_eq!(stats.clicks[0].ip, "203.0.113.7");
    }

    struct SlowGeo;

    #[async_trait::async_trait]
    impl GeoLookup for SlowGeo {
        async fn lookup(&self, _ip: &str) -> Option<GeoInfo> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Some(GeoInfo {
                country: Some("Too late".to_string()),
                region: None,
            })
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_geo_timeout_maps_to_unknown() {
        let service = service_with_geo(SlowGeo);
        service
            .create("https://example.com", None, Some("slow01"))
            .await
            .unwrap();

        service
            .resolve("slow01", &RequestContext::new("198.51.100.1"))
            .await
            .unwrap();

        let stats = service.get_statistics("slow01").await.unwrap();
        assert_eq!(stats.clicks[0].location, "Unknown");
    }

    #[tokio::test]
    async fn test_statistics_unknown_code() {
        let result = service().get_statistics("never1").await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_is_unique() {
        let service = service();
        assert!(service.is_unique("uniq01").await.unwrap());

        service
            .create("https://example.com", None, Some("uniq01"))
            .await
            .unwrap();
        assert!(!service.is_unique("uniq01").await.unwrap());
        assert_eq!(service.link_count().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_resolves_keep_counter_consistent() {
        let service = Arc::new(service());
        service
            .create("https://example.com", None, Some("hot001"))
            .await
            .unwrap();

        let handles: Vec<_> = (0..100)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.resolve("hot001", &local_ctx()).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stats = service.get_statistics("hot001").await.unwrap();
        assert_eq!(stats.total_clicks, 100);
        assert_eq!(stats.clicks.len(), 100);
    }
}
