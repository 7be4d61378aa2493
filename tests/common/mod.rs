#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::Layer;
use shorturl_service::application::services::{ShortenerService, ShortenerSettings};
use shorturl_service::domain::entities::NewLink;
use shorturl_service::domain::repositories::LinkRepository;
use shorturl_service::infrastructure::audit::AuditLogger;
use shorturl_service::infrastructure::geo::{GeoInfo, GeoLookup};
use shorturl_service::infrastructure::persistence::InMemoryLinkRepository;
use shorturl_service::routes::app_router;
use shorturl_service::state::AppState;

pub const BASE_URL: &str = "http://short.test";

/// Geo lookup returning a fixed answer and counting calls.
#[derive(Default)]
pub struct StubGeo {
    pub answer: Option<GeoInfo>,
    pub calls: AtomicUsize,
}

impl StubGeo {
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn answering(country: &str, region: Option<&str>) -> Self {
        Self {
            answer: Some(GeoInfo {
                country: Some(country.to_string()),
                region: region.map(String::from),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoLookup for StubGeo {
    async fn lookup(&self, _ip: &str) -> Option<GeoInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

pub struct TestApp {
    pub state: AppState,
    pub repository: Arc<InMemoryLinkRepository>,
}

pub fn create_test_app(geo: Arc<StubGeo>, behind_proxy: bool) -> TestApp {
    let repository = Arc::new(InMemoryLinkRepository::new());
    let shortener = Arc::new(ShortenerService::new(
        repository.clone(),
        geo,
        AuditLogger::disabled(),
        ShortenerSettings {
            base_url: BASE_URL.to_string(),
            max_code_attempts: 10,
            geo_timeout: std::time::Duration::from_millis(500),
        },
    ));

    TestApp {
        state: AppState::new(shortener, AuditLogger::disabled(), behind_proxy),
        repository,
    }
}

pub fn create_test_state() -> TestApp {
    create_test_app(Arc::new(StubGeo::failing()), false)
}

/// Full router with a fixed loopback peer address.
pub fn test_server(state: AppState) -> TestServer {
    let app: Router = app_router(state).layer(MockConnectInfoLayer);
    TestServer::new(app).unwrap()
}

/// Stores a link whose validity ended a minute ago.
pub async fn insert_expired_link(repo: &InMemoryLinkRepository, code: &str, url: &str) {
    let created_at = Utc::now() - Duration::minutes(6);
    let new_link = NewLink::starting_at(code.to_string(), url.to_string(), 5, created_at).unwrap();
    repo.insert(new_link).await.unwrap();
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
