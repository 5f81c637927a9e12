#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::extract::ConnectInfo;
use axum::routing::get;
use shortify::api::handlers::resolve_handler;
use shortify::api::routes::api_routes;
use shortify::application::services::{LinkService, RateLimitService};
use shortify::infrastructure::store::{KeyValueStore, MemoryStore, StoreError, StoreResult};
use shortify::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;

pub const DOMAIN: &str = "s.example.com";
pub const CLIENT_ADDR: &str = "127.0.0.1:12345";
pub const CLIENT_IP: &str = "127.0.0.1";

/// Stores behind a test state, kept around so tests can inspect them.
pub struct TestStores {
    pub links: Arc<MemoryStore>,
    pub counters: Arc<MemoryStore>,
}

pub fn create_test_state(quota: i64) -> (AppState, TestStores) {
    let links = Arc::new(MemoryStore::new());
    let counters = Arc::new(MemoryStore::new());

    let state = state_with(links.clone(), counters.clone(), quota);

    (state, TestStores { links, counters })
}

pub fn state_with(
    links: Arc<dyn KeyValueStore>,
    counters: Arc<dyn KeyValueStore>,
    quota: i64,
) -> AppState {
    let link_service = Arc::new(LinkService::new(links, counters.clone(), DOMAIN));
    let rate_limit_service = Arc::new(RateLimitService::new(counters, quota));

    AppState::new(link_service, rate_limit_service, false)
}

/// Same routes as the server, with a fixed peer address.
pub fn test_app(state: AppState) -> Router {
    Router::new()
        .route("/{alias}", get(resolve_handler))
        .nest("/api", api_routes())
        .layer(MockConnectInfoLayer)
        .with_state(state)
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
        let addr: SocketAddr = CLIENT_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Store whose every operation fails.
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Connection("refused".to_string()))
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl: Duration) -> StoreResult<()> {
        Err(StoreError::Connection("refused".to_string()))
    }

    async fn incr(&self, _key: &str) -> StoreResult<i64> {
        Err(StoreError::Connection("refused".to_string()))
    }

    async fn decr(&self, _key: &str) -> StoreResult<i64> {
        Err(StoreError::Connection("refused".to_string()))
    }

    async fn ttl(&self, _key: &str) -> StoreResult<Option<Duration>> {
        Err(StoreError::Connection("refused".to_string()))
    }

    async fn ping(&self) -> StoreResult<()> {
        Err(StoreError::Connection("refused".to_string()))
    }
}

/// In-memory store whose `decr` always fails.
#[derive(Default)]
pub struct DecrFailingStore {
    inner: MemoryStore,
}

#[async_trait]
impl KeyValueStore for DecrFailingStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        self.inner.set_ex(key, value, ttl).await
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        self.inner.incr(key).await
    }

    async fn decr(&self, _key: &str) -> StoreResult<i64> {
        Err(StoreError::Operation("READONLY".to_string()))
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<Duration>> {
        self.inner.ttl(key).await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.inner.ping().await
    }
}
