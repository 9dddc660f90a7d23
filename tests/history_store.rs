use ivone::models::{Message, Role};
use ivone::storage::{FilesystemHistoryStore, HistoryStore, HISTORY_FILE_NAME};
use std::fs;
use tempfile::TempDir;

fn sample_history() -> Vec<Message> {
    vec![
        Message::new(Role::User, "Olá", 1_000),
        Message::new(Role::Assistant, "Oi! Como posso ajudar?\n```rust\nfn main() {}\n```", 2_000),
        Message::new(Role::User, "Obrigado", 2_000),
    ]
}

#[test]
fn test_save_then_load_round_trips() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemHistoryStore::with_dir(temp_dir.path());
    let history = sample_history();

    store.save(&history).unwrap();

    assert_eq!(store.load(), history);
}

#[test]
fn test_save_creates_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("nested").join("ivone");
    let store = FilesystemHistoryStore::with_dir(&dir);

    store.save(&sample_history()).unwrap();

    assert!(dir.join(HISTORY_FILE_NAME).exists());
}

#[test]
fn test_save_overwrites_previous_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemHistoryStore::with_dir(temp_dir.path());

    store.save(&sample_history()).unwrap();
    let shorter = vec![Message::new(Role::User, "Só isto", 5_000)];
    store.save(&shorter).unwrap();

    assert_eq!(store.load(), shorter);
}

#[test]
fn test_snapshot_uses_camel_case_fields() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemHistoryStore::with_dir(temp_dir.path());
    store.save(&sample_history()).unwrap();

    let raw = fs::read_to_string(store.path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert!(json["lastUpdated"].is_i64());
    assert_eq!(json["messages"][0]["role"], "user");
    assert_eq!(json["messages"][0]["timestamp"], 1_000);
}

#[test]
fn test_load_without_snapshot_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemHistoryStore::with_dir(temp_dir.path());

    assert!(store.load().is_empty());
}

#[test]
fn test_load_corrupted_snapshot_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemHistoryStore::with_dir(temp_dir.path());

    for garbage in ["", "{", "null", "{\"messages\": 42}", "not json at all"] {
        fs::write(store.path(), garbage).unwrap();
        assert!(store.load().is_empty(), "garbage {:?} should load as empty", garbage);
    }
}

#[test]
fn test_clear_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemHistoryStore::with_dir(temp_dir.path());
    store.save(&sample_history()).unwrap();

    store.clear().unwrap();
    store.clear().unwrap();

    assert!(!store.path().exists());
    assert!(store.load().is_empty());
}

#[test]
fn test_default_store_lives_in_cache_dir() {
    let store = FilesystemHistoryStore::default();

    assert_eq!(
        store.path(),
        FilesystemHistoryStore::default_dir().join(HISTORY_FILE_NAME)
    );
    assert!(store.path().parent().unwrap().ends_with("ivone"));
}
