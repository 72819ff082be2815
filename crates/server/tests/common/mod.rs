//! Common test utilities for in-process HTTP testing with mocks.
//!
//! The fixture wires a real router over mock collaborators, so the stream
//! endpoint can be driven end to end without a database, a storage host or
//! a live swarm.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use hashgate_core::testing::{MockDiscoverer, MockRecordStore, MockUrlProber};
use hashgate_core::{Config, MetadataDiscoverer, Record, RecordStore, StreamResolver, UrlProber};
use hashgate_server::api::create_router;
use hashgate_server::state::AppState;

/// Re-export fixtures for test convenience
pub use hashgate_core::testing::fixtures;

pub const FALLBACK: &str = "https://fallback.test";
pub const STORAGE: &str = "https://storage.test";
pub const DIRECT_PLAY: &str = "https://play.test";

/// In-process server with controllable mocks.
///
/// ```rust,ignore
/// let fixture = TestFixture::new().await;
/// fixture.store.add(fixtures::completed_record("abc", "Movie", "movie.mkv")).await;
/// let response = fixture.get("/stream?link=abc&preload").await;
/// assert_eq!(response.status, StatusCode::OK);
/// ```
pub struct TestFixture {
    pub router: Router,
    pub store: Arc<MockRecordStore>,
    pub prober: Arc<MockUrlProber>,
    pub discoverer: Arc<MockDiscoverer>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).expect("Response body is not JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn location(&self) -> &str {
        self.header("location").expect("Missing Location header")
    }
}

impl TestFixture {
    pub async fn new() -> Self {
        let mut config = Config::default();
        config.resolver.fallback_base_url = FALLBACK.to_string();
        config.resolver.storage_base_url = STORAGE.to_string();
        config.resolver.direct_play_base_url = DIRECT_PLAY.to_string();

        let store = Arc::new(MockRecordStore::new());
        let prober = Arc::new(MockUrlProber::new());
        let discoverer = Arc::new(MockDiscoverer::new());

        let resolver = StreamResolver::new(
            config.resolver.clone(),
            Arc::clone(&store) as Arc<dyn RecordStore>,
            Arc::clone(&prober) as Arc<dyn UrlProber>,
        )
        .with_discoverer(Arc::clone(&discoverer) as Arc<dyn MetadataDiscoverer>);

        let state = Arc::new(AppState::new(config, resolver));

        Self {
            router: create_router(state),
            store,
            prober,
            discoverer,
        }
    }

    /// Store a completed record whose storage file is reachable at the
    /// path-based URL.
    pub async fn add_available(&self, record: Record) {
        let url = format!("{}/{}/{}", STORAGE, record.file_path, record.file_name);
        self.prober.set_reachable(url).await;
        self.store.add(record).await;
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            headers,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

#[macro_export]
macro_rules! assert_status {
    ($response:expr, $expected:expr) => {
        assert_eq!(
            $response.status, $expected,
            "Expected status {}, got {}. Body: {}",
            $expected, $response.status, $response.text
        );
    };
}
