//! Tests for the JSON-file-backed tool store

use pretty_assertions::assert_eq;
use serde_json::Value;
use sharer_core::{Error, NewTool, RecordKind, RobustnessConfig, ToolStore};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn open(path: &Path) -> ToolStore {
    ToolStore::open(path, RobustnessConfig::default())
}

#[test]
fn test_load_all_without_prior_save_is_empty() {
    let dir = tempdir().unwrap();
    let store = open(&dir.path().join("tools.json"));

    let outcome = store.load_outcome().unwrap();
    assert!(outcome.collection.is_empty());
    assert!(outcome.corruption.is_none());
    assert!(!dir.path().join("tools.json").exists());
}

#[test]
fn test_records_persist_across_store_instances() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tools.json");

    let id = open(&path)
        .create_record(NewTool::published("A photo of a cat", "<img>"))
        .unwrap();
    open(&path).increment_like(&id).unwrap();

    let record = open(&path).get_by_id(&id).unwrap().unwrap();
    assert_eq!(record.prompt(), Some("A photo of a cat"));
    assert_eq!(record.code(), "<img>");
    assert_eq!(record.likes(), 1);
}

#[test]
fn test_persisted_layout_is_keyed_by_id() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tools.json");
    let store = open(&path);

    let published = store
        .create_record(NewTool::published("prompt", "<p>1</p>"))
        .unwrap();
    let imported = store.create_record(NewTool::imported("<p>2</p>")).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let doc: Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(doc[&published]["kind"], "published");
    assert_eq!(doc[&published]["id"], published.as_str());
    assert_eq!(doc[&published]["likes"], 0);
    assert!(doc[&published]["createdAt"].is_string());
    assert_eq!(doc[&imported]["kind"], "imported");
    assert!(doc[&imported].get("prompt").is_none());
    assert!(raw.starts_with("{\n  \""));
}

#[test]
fn test_missing_like_target_writes_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tools.json");
    let store = open(&path);
    store.create_record(NewTool::published("p", "c")).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let err = store.increment_like("does-not-exist").unwrap_err();

    assert!(matches!(err, Error::NotFound { ref id } if id == "does-not-exist"));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_corrupt_document_degrades_to_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tools.json");
    fs::write(&path, "{ this is not json").unwrap();
    let store = open(&path);

    let outcome = store.load_outcome().unwrap();
    assert!(outcome.collection.is_empty());
    assert!(outcome.corruption.is_some());

    // load_all hides the corruption entirely
    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn test_corrupt_document_is_moved_aside_on_next_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tools.json");
    fs::write(&path, "[1, 2, 3]").unwrap();
    let store = open(&path);

    let id = store
        .create_record(NewTool::published("fresh", "<p/>"))
        .unwrap();

    let preserved: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("tools.json.corrupt-"))
        .collect();
    assert_eq!(preserved.len(), 1);
    assert_eq!(
        fs::read_to_string(dir.path().join(&preserved[0])).unwrap(),
        "[1, 2, 3]"
    );

    let collection = store.load_all().unwrap();
    assert_eq!(collection.len(), 1);
    assert!(collection.get(&id).is_some());
}

#[test]
fn test_invalid_utf8_document_is_corruption() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tools.json");
    fs::write(&path, [0xff, 0xfe, 0xfd]).unwrap();

    let outcome = open(&path).load_outcome().unwrap();
    assert!(outcome.corruption.is_some());
}

#[test]
fn test_legacy_entries_are_upgraded_on_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tools.json");
    fs::write(&path, r#"{"legacy1": "<h1>old</h1>"}"#).unwrap();
    let store = open(&path);

    let legacy = store.get_by_id("legacy1").unwrap().unwrap();
    assert_eq!(legacy.kind(), RecordKind::Imported);
    assert_eq!(legacy.code(), "<h1>old</h1>");

    store.create_record(NewTool::imported("<p/>")).unwrap();

    let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["legacy1"]["kind"], "imported");
    assert_eq!(doc["legacy1"]["code"], "<h1>old</h1>");
    assert!(doc["legacy1"].get("createdAt").is_none());
}

#[test]
fn test_quarantined_entries_survive_mutations() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tools.json");
    fs::write(
        &path,
        r#"{"broken": {"kind": "published", "id": "broken", "likes": "many"}}"#,
    )
    .unwrap();
    let store = open(&path);

    assert!(store.get_by_id("broken").unwrap().is_none());
    assert!(store.increment_like("broken").unwrap_err().is_not_found());

    store.create_record(NewTool::published("p", "c")).unwrap();

    let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["broken"]["likes"], "many");
}

#[test]
fn test_unwritable_location_is_storage_unavailable() {
    let dir = tempdir().unwrap();
    // A regular file where the store expects a directory
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let store = open(&blocker.join("tools.json"));

    let err = store
        .create_record(NewTool::published("p", "c"))
        .unwrap_err();
    assert!(matches!(err, Error::StorageUnavailable(_)), "got {:?}", err);
}

#[test]
fn test_like_at_counter_maximum_writes_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tools.json");
    fs::write(
        &path,
        r#"{"x": {"kind": "published", "id": "x", "prompt": "p", "code": "c",
            "likes": 18446744073709551615, "createdAt": "2024-01-01T00:00:00Z"}}"#,
    )
    .unwrap();
    let before = fs::read_to_string(&path).unwrap();
    let store = open(&path);

    let err = store.increment_like("x").unwrap_err();

    assert!(matches!(err, Error::InvalidRecord { ref id, .. } if id == "x"));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    assert_eq!(store.get_by_id("x").unwrap().unwrap().likes(), u64::MAX);
}

fn preserved_copies(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("tools.json.corrupt-"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_repaired_document_is_not_moved_aside_by_stale_reader() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tools.json");
    fs::write(&path, "not json").unwrap();
    let reader = open(&path);
    let writer = open(&path);

    assert!(reader.load_outcome().unwrap().corruption.is_some());
    let id = writer
        .create_record(NewTool::published("fresh", "<p/>"))
        .unwrap();
    reader.increment_like(&id).unwrap();

    let preserved = preserved_copies(dir.path());
    assert_eq!(preserved.len(), 1);
    assert_eq!(
        fs::read_to_string(dir.path().join(&preserved[0])).unwrap(),
        "not json"
    );
    assert_eq!(open(&path).get_by_id(&id).unwrap().unwrap().likes(), 1);
}

#[test]
fn test_stale_flag_with_unsynchronized_save_keeps_valid_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tools.json");
    fs::write(&path, "not json").unwrap();
    let reader = open(&path);
    let writer = open(&path);

    assert!(reader.load_outcome().unwrap().corruption.is_some());
    writer
        .create_record(NewTool::published("fresh", "<p/>"))
        .unwrap();

    // A raw save with no load in between must not treat the repaired file
    // as corrupt.
    let collection = writer.load_all().unwrap();
    reader.save_all(&collection).unwrap();

    assert_eq!(preserved_copies(dir.path()).len(), 1);
    assert_eq!(open(&path).load_all().unwrap().len(), 1);
}

#[test]
fn test_each_corruption_gets_its_own_preserved_copy() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tools.json");
    let store = open(&path);

    fs::write(&path, "first broken").unwrap();
    store.create_record(NewTool::imported("<p>1</p>")).unwrap();
    fs::write(&path, "second broken").unwrap();
    store.create_record(NewTool::imported("<p>2</p>")).unwrap();

    let contents: Vec<String> = preserved_copies(dir.path())
        .iter()
        .map(|name| fs::read_to_string(dir.path().join(name)).unwrap())
        .collect();
    assert_eq!(contents.len(), 2);
    assert!(contents.contains(&"first broken".to_string()));
    assert!(contents.contains(&"second broken".to_string()));
}
