//! Query flow integration tests.
//!
//! These tests drive the engine end to end with mock backends and a real
//! on-disk cache: search -> per-record resolution -> result items.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

use shelfcover_core::{
    testing::{fixtures, MockCatalog, MockCoverSource},
    CacheKey, CoverHint, Config, Engine,
};

/// Test helper holding the engine and its mock backends.
struct TestHarness {
    engine: Engine,
    catalog: Arc<MockCatalog>,
    covers: Arc<MockCoverSource>,
    temp_dir: TempDir,
}

impl TestHarness {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut config = Config::default().resolve_paths(temp_dir.path());
        config.covers.base_url = "https://covers.test".to_string();

        let catalog = Arc::new(MockCatalog::new());
        let covers = Arc::new(MockCoverSource::new());
        let engine = Engine::with_backends(config, catalog.clone(), covers.clone())
            .await
            .expect("Failed to build engine");

        Self {
            engine,
            catalog,
            covers,
            temp_dir,
        }
    }

    fn default_cover(&self) -> String {
        self.temp_dir.path().join("book.png").display().to_string()
    }
}

#[tokio::test]
async fn test_blank_query_makes_no_network_calls() {
    let h = TestHarness::new().await;

    for term in ["", "   "] {
        let items = h.engine.handle_query(term).await;
        assert_eq!(items.len(), 1);
        assert!(items[0].action.is_none());
    }

    assert!(h.catalog.recorded_queries().await.is_empty());
    assert!(h.covers.requested_urls().await.is_empty());
}

#[tokio::test]
async fn test_icons_are_cached_files_or_default() {
    let h = TestHarness::new().await;

    let mut with_isbn = fixtures::candidate_record("Dune Messiah", None);
    with_isbn.isbn = Some("9780593098233".to_string());
    with_isbn.cover_hint = CoverHint::IsbnDerived("9780593098233".to_string());

    h.catalog
        .set_results(vec![
            fixtures::candidate_record("Dune", Some(11481354)),
            with_isbn,
            fixtures::candidate_record("Dune (no cover)", None),
        ])
        .await;
    h.covers
        .set_response(
            "https://covers.test/b/id/11481354-M.jpg",
            fixtures::cover_bytes(20_000),
        )
        .await;
    // The ISBN endpoint serves the blank placeholder
    h.covers
        .set_response(
            "https://covers.test/b/isbn/9780593098233-M.jpg",
            fixtures::cover_bytes(43),
        )
        .await;

    let items = h.engine.handle_query("dune").await;
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| i.title.contains("Dune")));

    let cached = h.engine.cache().path_for(&CacheKey::new("11481354"));
    assert_eq!(items[0].icon_path, cached.display().to_string());
    assert_eq!(items[1].icon_path, h.default_cover());
    assert_eq!(items[2].icon_path, h.default_cover());

    for item in &items {
        let icon = Path::new(&item.icon_path);
        assert!(icon.exists() || item.icon_path == h.default_cover());
    }
}

#[tokio::test]
async fn test_second_query_is_served_from_cache() {
    let h = TestHarness::new().await;
    h.catalog
        .set_results(vec![fixtures::candidate_record("Dune", Some(42))])
        .await;
    h.covers
        .set_response("https://covers.test/b/id/42-M.jpg", fixtures::cover_bytes(5000))
        .await;

    let first = h.engine.handle_query("dune").await;
    let requests_after_first = h.covers.requested_urls().await.len();
    let second = h.engine.handle_query("dune").await;

    assert_eq!(first, second);
    assert_eq!(requests_after_first, 1);
    assert_eq!(h.covers.requested_urls().await.len(), requests_after_first);
}

#[tokio::test]
async fn test_results_are_capped_at_five() {
    let h = TestHarness::new().await;
    h.catalog
        .set_results(
            (1..=10)
                .map(|i| fixtures::candidate_record(&format!("Book {}", i), None))
                .collect(),
        )
        .await;

    let items = h.engine.handle_query("book").await;
    assert_eq!(items.len(), 5);
    assert_eq!(items[4].title, "Book 5");
}

#[tokio::test]
async fn test_sweep_evicts_only_expired_covers() {
    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    let h = TestHarness::new().await;
    let cache = h.engine.cache();
    let old = cache
        .write(&CacheKey::new("old"), &fixtures::cover_bytes(2000))
        .await
        .unwrap();
    let fresh = cache
        .write(&CacheKey::new("fresh"), &fixtures::cover_bytes(2000))
        .await
        .unwrap();

    for (path, age) in [(&old, 4 * DAY), (&fresh, 2 * DAY)] {
        std::fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(SystemTime::now() - age)
            .unwrap();
    }

    let report = h.engine.sweep_now().await;
    assert_eq!(report.removed, 1);
    assert!(!old.exists());
    assert!(fresh.exists());
}

#[tokio::test]
async fn test_query_after_startup_sweep_never_points_at_evicted_file() {
    let h = TestHarness::new().await;
    let key = CacheKey::new("42");
    let stale = h
        .engine
        .cache()
        .write(&key, &fixtures::cover_bytes(2000))
        .await
        .unwrap();
    std::fs::File::options()
        .write(true)
        .open(&stale)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(4 * 24 * 60 * 60))
        .unwrap();

    h.catalog
        .set_results(vec![fixtures::candidate_record("Dune", Some(42))])
        .await;
    h.covers
        .set_response("https://covers.test/b/id/42-M.jpg", fixtures::cover_bytes(5000))
        .await;

    h.engine.start_eviction().await;
    let items = h.engine.handle_query("dune").await;
    h.engine.shutdown().await;

    // The stale entry was swept first, so the cover was fetched again
    assert_eq!(h.covers.requested_urls().await.len(), 1);
    assert_eq!(items[0].icon_path, stale.display().to_string());
    assert_eq!(std::fs::metadata(&stale).unwrap().len(), 5000);
}
