//! Integration tests for configuration persistence.
//!
//! These tests exercise `ConfigStore` over the real `FileBlobStorage`, so the
//! JSON document actually hits the disk and is read back by a fresh store, the
//! way a second process launch would see it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use qring_app::application::config_store::ConfigStore;
use qring_app::infrastructure::storage::FileBlobStorage;
use qring_core::{
    decide_initial_route, Address, CommunicationMode, ConfigRecord, InitialRoute,
    CONFIG_STORAGE_KEY,
};
use uuid::Uuid;

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("qring_persist_{}", Uuid::new_v4()))
}

fn full_record() -> ConfigRecord {
    ConfigRecord {
        contact_number: Some("5491112345678".to_string()),
        address: Some(Address {
            street: "Av. Corrientes".to_string(),
            number: "1234".to_string(),
            unit: Some("7C".to_string()),
        }),
        show_address_on_label: false,
        communication_mode: CommunicationMode::WhatsApp,
    }
}

fn store_over(dir: &Path) -> (ConfigStore, FileBlobStorage) {
    let storage = FileBlobStorage::new(dir);
    (ConfigStore::new(Arc::new(storage.clone())), storage)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_saved_record_survives_a_new_store() {
    // Arrange
    let dir = temp_dir();
    let (first, _) = store_over(&dir);
    first.load().await.expect("initial load");

    // Act
    first.save(full_record()).await.expect("save");
    let (second, _) = store_over(&dir);
    let loaded = second.load().await.expect("reload");

    // Assert: every field survives the round trip
    assert_eq!(loaded, Some(full_record()));
    assert_eq!(second.snapshot().await, Some(full_record()));
    assert!(!second.is_loading());

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_document_on_disk_is_versioned_camel_case_json() {
    let dir = temp_dir();
    let (store, storage) = store_over(&dir);
    store.save(full_record()).await.expect("save");

    let raw = std::fs::read_to_string(storage.path_for(CONFIG_STORAGE_KEY)).expect("read file");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");

    assert_eq!(json["version"], 1);
    assert_eq!(json["contactNumber"], "5491112345678");
    assert_eq!(json["showAddressOnLabel"], false);
    assert!(storage
        .path_for(CONFIG_STORAGE_KEY)
        .ends_with("QRing_WS_config.json"));

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_corrupt_file_loads_as_absent() {
    // Arrange
    let dir = temp_dir();
    let (store, storage) = store_over(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(storage.path_for(CONFIG_STORAGE_KEY), "{not json").unwrap();

    // Act
    let loaded = store.load().await;

    // Assert
    assert!(matches!(loaded, Ok(None)));
    assert_eq!(decide_initial_route(store.snapshot().await.as_ref()), InitialRoute::NeedsConfig);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_legacy_unversioned_document_loads_as_absent() {
    let dir = temp_dir();
    let (store, storage) = store_over(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        storage.path_for(CONFIG_STORAGE_KEY),
        r#"{"whatsapp":"1112345678","direccion":"Main 10"}"#,
    )
    .unwrap();

    assert_eq!(store.load().await.expect("load"), None);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_corrupt_file_is_replaced_by_next_save() {
    let dir = temp_dir();
    let (store, storage) = store_over(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(storage.path_for(CONFIG_STORAGE_KEY), "garbage").unwrap();
    store.load().await.expect("load");

    store.save(full_record()).await.expect("save over corrupt file");

    let (fresh, _) = store_over(&dir);
    assert_eq!(fresh.load().await.expect("reload"), Some(full_record()));

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_clear_removes_file_and_next_launch_needs_config() {
    let dir = temp_dir();
    let (store, storage) = store_over(&dir);
    store.save(full_record()).await.expect("save");

    store.clear().await.expect("clear");

    assert!(!storage.path_for(CONFIG_STORAGE_KEY).exists());
    let (fresh, _) = store_over(&dir);
    let loaded = fresh.load().await.expect("reload");
    assert_eq!(decide_initial_route(loaded.as_ref()), InitialRoute::NeedsConfig);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_invalid_utf8_inside_a_field_loads_as_absent() {
    // Arrange: a well-formed document whose contact number holds a stray 0xFF
    let dir = temp_dir();
    let (store, storage) = store_over(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let mut blob = br#"{"version":1,"contactNumber":"549111"#.to_vec();
    blob.push(0xFF);
    blob.extend_from_slice(br#"2345678","address":{"street":"Main","number":"10"}}"#);
    std::fs::write(storage.path_for(CONFIG_STORAGE_KEY), blob).unwrap();

    // Act
    let loaded = store.load().await;

    // Assert
    assert!(matches!(loaded, Ok(None)), "got {loaded:?}");
    assert_eq!(decide_initial_route(store.snapshot().await.as_ref()), InitialRoute::NeedsConfig);

    std::fs::remove_dir_all(&dir).ok();
}
