//! Resolution against a real SQLite store, with the network collaborators mocked.

use std::sync::Arc;

use hashgate_core::testing::{fixtures, MockDiscoverer, MockUrlProber};
use hashgate_core::{
    MetadataDiscoverer, RecordStore, RedirectTarget, Resolution, ResolverConfig,
    SqliteRecordStore, StreamMode, StreamRequest, StreamResolver, UrlProber,
};
use tempfile::TempDir;

const HASH: &str = "08ada5a7a6183aae1e09d831df6748d566095a10";

fn config() -> ResolverConfig {
    ResolverConfig {
        fallback_base_url: "https://fallback.test".to_string(),
        storage_base_url: "https://storage.test/".to_string(),
        direct_play_base_url: "https://play.test".to_string(),
        ..Default::default()
    }
}

struct Harness {
    _dir: TempDir,
    store: Arc<SqliteRecordStore>,
    prober: Arc<MockUrlProber>,
    discoverer: Arc<MockDiscoverer>,
    resolver: StreamResolver,
}

fn harness() -> Harness {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SqliteRecordStore::new(&dir.path().join("records.db")).unwrap());
    let prober = Arc::new(MockUrlProber::new());
    let discoverer = Arc::new(MockDiscoverer::new());

    let resolver = StreamResolver::new(
        config(),
        Arc::clone(&store) as Arc<dyn RecordStore>,
        Arc::clone(&prober) as Arc<dyn UrlProber>,
    )
    .with_discoverer(Arc::clone(&discoverer) as Arc<dyn MetadataDiscoverer>);

    Harness {
        _dir: dir,
        store,
        prober,
        discoverer,
        resolver,
    }
}

#[tokio::test]
async fn test_preload_finds_stored_record_case_insensitively() {
    let h = harness();
    h.store
        .insert(&fixtures::completed_record(HASH, "Sintel", "sintel.mkv"))
        .await
        .unwrap();

    let request = StreamRequest::new(HASH.to_uppercase(), StreamMode::Preload);
    match h.resolver.resolve(&request).await {
        Resolution::Available(record) => {
            assert_eq!(record.identifier, HASH);
            assert_eq!(record.file_name, "sintel.mkv");
        }
        other => panic!("expected record, got {:?}", other),
    }
    assert!(h.discoverer.calls().await.is_empty());
}

#[tokio::test]
async fn test_incomplete_record_is_a_miss() {
    let h = harness();
    h.store
        .insert(&fixtures::completed_record(HASH, "Sintel", "sintel.mkv").with_completed(false))
        .await
        .unwrap();

    let request = StreamRequest::new(HASH, StreamMode::Preload).with_index("3");
    assert_eq!(
        h.resolver.resolve(&request).await,
        Resolution::Redirect {
            location: format!("https://fallback.test/stream?link={}&index=3&preload", HASH),
            target: RedirectTarget::Fallback,
        }
    );
}

#[tokio::test]
async fn test_play_via_discovered_title_and_storage_probe() {
    let h = harness();
    h.store
        .insert(&fixtures::completed_record("stored-id", "Tears of Steel", "tos.mp4"))
        .await
        .unwrap();
    h.discoverer
        .set_metadata(HASH, fixtures::single_file_metadata("Tears of Steel 1080p", "tos.mp4"))
        .await;
    h.prober
        .set_reachable("https://storage.test/movies/stored-id/tos.mp4")
        .await;

    let request = StreamRequest::new(HASH, StreamMode::Play);
    assert_eq!(
        h.resolver.resolve(&request).await,
        Resolution::Redirect {
            location: "https://storage.test/movies/stored-id/tos.mp4".to_string(),
            target: RedirectTarget::Storage,
        }
    );
}

#[tokio::test]
async fn test_unrelated_discovered_title_falls_back() {
    let h = harness();
    h.store
        .insert(&fixtures::completed_record("stored-id", "Tears of Steel", "tos.mp4"))
        .await
        .unwrap();
    h.discoverer
        .set_metadata(HASH, fixtures::single_file_metadata("Cosmos Laundromat", "cl.mkv"))
        .await;

    let request = StreamRequest::new(HASH, StreamMode::Play);
    assert_eq!(
        h.resolver.resolve(&request).await,
        Resolution::Redirect {
            location: format!("https://fallback.test/stream?link={}&index=1&play", HASH),
            target: RedirectTarget::Fallback,
        }
    );
    assert!(h.prober.probed().await.is_empty());
}
