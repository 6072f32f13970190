//! Contract tests for the persistence adapter
//!
//! Loading never fails, saving is best effort and never blocks editing,
//! exports use the layout-specific file name.

use dynui::{
    config::{
        FileStorage, KeyValueStorage, MemoryStorage, PersistenceAdapter, PersistenceError,
        STORAGE_KEY,
    },
    models::{Configuration, FieldPath, FieldValue, Layout},
    services::ConfigStore,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Storage that refuses every write and counts attempts
#[derive(Default)]
struct ReadOnlyStorage {
    attempts: AtomicUsize,
}

impl KeyValueStorage for ReadOnlyStorage {
    fn read(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(None)
    }

    fn write(&self, _key: &str, _contents: &str) -> Result<(), PersistenceError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(PersistenceError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }
}

#[test]
fn test_load_without_saved_state_is_default() {
    let adapter = PersistenceAdapter::new(Arc::new(MemoryStorage::new()));
    assert_eq!(adapter.load(), Configuration::default());
}

#[test]
fn test_load_corrupt_or_misshapen_state_is_default() {
    for stored in ["", "{", "[1,2,3]", "\"ui\"", "null"] {
        let adapter = PersistenceAdapter::new(Arc::new(MemoryStorage::with_entry(STORAGE_KEY, stored)));
        assert_eq!(adapter.load(), Configuration::default(), "{:?}", stored);
    }
}

#[test]
fn test_saved_document_uses_original_keys() {
    let storage = Arc::new(MemoryStorage::new());
    let adapter = PersistenceAdapter::new(storage.clone());
    adapter.save(&Configuration::default()).unwrap();

    let saved: serde_json::Value =
        serde_json::from_str(&storage.read(STORAGE_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(saved["layout"], "layout1");
    assert_eq!(saved["button"]["strokeWeight"], 0);
    assert_eq!(saved["general"]["containerPadding"], 24);
    assert_eq!(saved["general"]["sectionBg"], "#ffffff");
}

#[test]
fn test_save_failure_does_not_reject_mutation() {
    let storage = Arc::new(ReadOnlyStorage::default());
    let adapter = Arc::new(PersistenceAdapter::new(storage.clone()));
    let mut store = ConfigStore::new(adapter.load());
    adapter.attach(&mut store);

    let config = store
        .apply(&FieldPath::from("layout"), &FieldValue::from("layout2"))
        .unwrap();

    assert_eq!(config.layout, Layout::Layout2);
    assert_eq!(storage.attempts.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unsubscribed_adapter_stops_saving() {
    let storage = Arc::new(ReadOnlyStorage::default());
    let adapter = Arc::new(PersistenceAdapter::new(storage.clone()));
    let mut store = ConfigStore::default();

    let id = adapter.attach(&mut store);
    store.reset();
    assert!(store.unsubscribe(id));
    store.reset();

    assert_eq!(storage.attempts.load(Ordering::SeqCst), 1);
}

#[test]
fn test_custom_key() {
    let storage = Arc::new(MemoryStorage::new());
    let adapter = PersistenceAdapter::with_key(storage.clone(), "preview-cfg");
    adapter.save(&Configuration::default()).unwrap();

    assert_eq!(adapter.key(), "preview-cfg");
    assert!(storage.read("preview-cfg").unwrap().is_some());
    assert!(storage.read(STORAGE_KEY).unwrap().is_none());
}

#[test]
fn test_file_storage_overwrites_previous_save() {
    let temp_dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::in_dir(temp_dir.path()));
    let adapter = PersistenceAdapter::new(storage.clone());

    let mut config = Configuration::default();
    adapter.save(&config).unwrap();
    config.layout = Layout::Layout2;
    adapter.save(&config).unwrap();

    assert_eq!(adapter.load().layout, Layout::Layout2);
    assert_eq!(storage.path_for(STORAGE_KEY), temp_dir.path().join("ui-cfg.json"));
}

#[test]
fn test_export_is_pretty_and_reimportable() {
    let adapter = PersistenceAdapter::new(Arc::new(MemoryStorage::new()));
    let mut store = ConfigStore::default();
    store
        .apply(&FieldPath::from("gallery.align"), &FieldValue::from("left"))
        .unwrap();

    let document = adapter.export_document(&store.get()).unwrap();
    let text = String::from_utf8(document.bytes.clone()).unwrap();
    assert!(text.starts_with("{\n  \"layout\""));

    let mut other = ConfigStore::default();
    let imported = adapter.import_document(&mut other, &document.bytes).unwrap();
    assert_eq!(*imported, *store.get());
}
