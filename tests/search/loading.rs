//! Snapshot transport, reload, and readiness.

use std::fs;
use std::sync::Arc;
use std::thread;

use super::common::{city_snapshot, sample_snapshot};
use cartosearch::{
    snapshot_location, FileSource, IndexStore, OfflineSearch, SearchConfig, SearchError,
    SnapshotSource, SNAPSHOT_FILE_NAME,
};
use tempfile::TempDir;

const SNAPSHOT_JSON: &str = r#"{
  "keywordIndex": {
    "Amsterdam": [{ "layerIndex": 0, "featureIndex": 1 }],
    "Zaandam": [{ "layerIndex": 0, "featureIndex": 0 }]
  },
  "layers": [
    {
      "id": "towns",
      "title": "Towns",
      "groupTitle": "Noord-Holland",
      "featureNames": ["Zaandam", "Amsterdam"]
    }
  ]
}"#;

fn project_dir(json: &str) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let maps = dir.path().join("maps");
    fs::create_dir_all(&maps).expect("Failed to create maps dir");
    fs::write(maps.join(SNAPSHOT_FILE_NAME), json).expect("Failed to write snapshot");
    dir
}

#[test]
fn test_file_source_reads_snapshot_next_to_project() {
    let dir = project_dir(SNAPSHOT_JSON);
    let source = FileSource::new(dir.path());

    let snapshot = source
        .load_snapshot(&snapshot_location("maps/project.json"))
        .expect("snapshot should load");

    assert_eq!(snapshot.layers.len(), 1);
    assert_eq!(snapshot.layers[0].group_title, "Noord-Holland");
    assert_eq!(snapshot.keyword_index.len(), 2);
}

#[test]
fn test_loaded_file_is_searchable() {
    let dir = project_dir(SNAPSHOT_JSON);
    let search = OfflineSearch::new(SearchConfig::default());

    let generation = search
        .store()
        .load_from(&FileSource::new(dir.path()), "maps/offline_search_result.json")
        .expect("snapshot should load");

    assert_eq!(generation, 1);
    let results = search.search("zaandam", 15);
    assert_eq!(results[0].title, "Zaandam");
    assert_eq!(results[0].group_key(), "Noord-Holland >> Towns");
}

#[test]
fn test_missing_file_is_transport_failure() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = IndexStore::new();

    let err = store
        .load_from(&FileSource::new(dir.path()), "missing/offline_search_result.json")
        .unwrap_err();

    assert!(matches!(err, SearchError::Transport { .. }));
    assert!(!store.is_ready());
}

#[test]
fn test_malformed_json_is_rejected() {
    let dir = project_dir("{ \"keywordIndex\": [1, 2");
    let store = IndexStore::new();

    let err = store
        .load_from(&FileSource::new(dir.path()), "maps/offline_search_result.json")
        .unwrap_err();

    assert!(matches!(err, SearchError::Json(_)));
    assert!(!store.is_ready());
}

#[test]
fn test_failed_reload_keeps_previous_generation() {
    let store = IndexStore::new();
    store.load(sample_snapshot());

    assert!(store.load_json(b"not json").is_err());

    assert!(store.is_ready());
    assert_eq!(store.generation(), 1);
    assert_eq!(store.layer_info(0).expect("layer 0").id, "cities");
}

#[test]
fn test_reload_is_visible_to_next_query() {
    let search = OfflineSearch::default();
    search.load(sample_snapshot());
    assert!(!search.search("rotterdam", 15).is_empty());

    search.load(city_snapshot());

    assert_eq!(search.store().generation(), 2);
    assert!(search.search("rotterdam", 15).is_empty());
    assert_eq!(search.search("vondelpark", 15)[0].title, "Vondelpark");
}

#[test]
fn test_pinned_generation_survives_reload() {
    let store = IndexStore::new();
    store.load(sample_snapshot());
    let pinned = store.current().expect("loaded");

    store.load(city_snapshot());

    assert_eq!(pinned.layers()[0].id, "cities");
    assert_eq!(store.layer_info(0).expect("layer 0").id, "landmarks");
}

#[test]
fn test_reset_makes_store_unavailable() {
    let store = IndexStore::new();
    store.load(sample_snapshot());

    store.reset();

    assert!(matches!(store.current(), Err(SearchError::IndexUnavailable)));
}

#[test]
fn test_concurrent_queries_during_reload() {
    let search = Arc::new(OfflineSearch::default());
    search.load(sample_snapshot());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let search = Arc::clone(&search);
            thread::spawn(move || {
                for _ in 0..50 {
                    let results = search.search("amsterdam", 15);
                    assert_eq!(results[0].title, "Amsterdam");
                }
            })
        })
        .collect();

    for _ in 0..10 {
        search.load(sample_snapshot());
    }

    for reader in readers {
        reader.join().expect("reader thread panicked");
    }
    assert_eq!(search.store().generation(), 11);
}

#[test]
fn test_snapshot_location_variants() {
    assert_eq!(
        snapshot_location("data/projects/city/project.json"),
        "data/projects/city/offline_search_result.json"
    );
    assert_eq!(snapshot_location("data/city/"), "data/city/offline_search_result.json");
    assert_eq!(snapshot_location("data/city"), "data/city/offline_search_result.json");
}
