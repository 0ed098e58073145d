use chrono::{Duration, Utc};
use tempfile::tempdir;

use melcookie::cache::{CacheStore, CachedExtraction, FileCacheStore};
use melcookie::extract::cached_status_line;

fn store_with_cookie_aged(dir: &std::path::Path, age: Duration) -> FileCacheStore {
    let store = FileCacheStore::with_path(dir.join("last_extraction.json"));
    let extraction = CachedExtraction::new("a=1; b=2".to_string(), Utc::now() - age);
    store.save(&extraction).expect("save");
    store
}

#[test]
fn fresh_cache_produces_status_line() {
    let dir = tempdir().expect("tempdir");
    let store = store_with_cookie_aged(dir.path(), Duration::hours(23));
    let line = cached_status_line(&store, Utc::now())
        .expect("status")
        .expect("line for fresh cache");
    assert!(line.contains("23"));
}

#[test]
fn stale_cache_produces_nothing() {
    let dir = tempdir().expect("tempdir");
    let store = store_with_cookie_aged(dir.path(), Duration::hours(25));
    assert!(cached_status_line(&store, Utc::now())
        .expect("status")
        .is_none());
}

#[test]
fn freshness_boundary_is_strict() {
    let dir = tempdir().expect("tempdir");
    let store = FileCacheStore::with_path(dir.path().join("last_extraction.json"));
    let now = Utc::now();
    store
        .save(&CachedExtraction::new(
            "a=1".to_string(),
            now - Duration::hours(24),
        ))
        .expect("save");
    assert!(cached_status_line(&store, now).expect("status").is_none());
}

#[test]
fn age_is_rounded_to_nearest_hour() {
    let dir = tempdir().expect("tempdir");
    let store = store_with_cookie_aged(
        dir.path(),
        Duration::hours(23) + Duration::minutes(36),
    );
    let line = cached_status_line(&store, Utc::now())
        .expect("status")
        .expect("line for fresh cache");
    assert!(line.contains("24"));
}

#[test]
fn absent_cache_produces_nothing() {
    let dir = tempdir().expect("tempdir");
    let store = FileCacheStore::with_path(dir.path().join("last_extraction.json"));
    assert!(cached_status_line(&store, Utc::now())
        .expect("status")
        .is_none());
}

#[test]
fn mangled_cache_file_produces_nothing() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("last_extraction.json");
    std::fs::write(&path, "definitely not json").expect("write");
    let store = FileCacheStore::with_path(path);
    assert!(cached_status_line(&store, Utc::now())
        .expect("status")
        .is_none());
}
