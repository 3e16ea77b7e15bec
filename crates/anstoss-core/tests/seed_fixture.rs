use anstoss_core::{default_suggestions, FileStore, StoreConfig, Suggestion, WeightStore};
use std::fs;

#[test]
fn test_seed_fixture_matches_default_pool() {
    let content = fs::read_to_string("../../tests/fixtures/weights/seed.ok.json")
        .expect("Failed to read fixture file");

    let table: Vec<Suggestion> =
        serde_json::from_str(&content).expect("Failed to deserialize seed fixture");

    assert_eq!(table, default_suggestions());
}

#[test]
fn test_fixture_table_loads_through_file_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::new(StoreConfig::new(dir.path()));
    fs::copy(
        "../../tests/fixtures/weights/seed.ok.json",
        store.config().weights_path(),
    )
    .expect("Failed to copy fixture");

    let table = store.load_weights().expect("fixture should load");

    assert_eq!(table.len(), 3);
    assert_eq!(table[1].id, "SUG-2");
}
