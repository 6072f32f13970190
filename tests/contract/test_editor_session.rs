//! Contract tests for the interactive editor session
//!
//! Commands are applied in order by one task; autosave writes the latest
//! snapshot and the final snapshot is saved before shutdown returns.

use dynui::{
    config::{KeyValueStorage, MemoryStorage, PersistenceAdapter, PersistenceError, STORAGE_KEY},
    models::{Configuration, Layout},
    services::{EditorSession, SessionConfig, SessionError, SessionEvent},
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Storage that takes a while per write and records each write
#[derive(Default)]
struct SlowStorage {
    writes: AtomicUsize,
    last: Mutex<Option<String>>,
}

impl KeyValueStorage for SlowStorage {
    fn read(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(None)
    }

    fn write(&self, _key: &str, contents: &str) -> Result<(), PersistenceError> {
        std::thread::sleep(Duration::from_millis(50));
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(contents.to_string());
        Ok(())
    }
}

fn spawn_with(storage: Arc<dyn KeyValueStorage>, config: SessionConfig) -> EditorSession {
    EditorSession::spawn(
        Configuration::default(),
        Arc::new(PersistenceAdapter::new(storage)),
        config,
    )
}

#[tokio::test]
async fn test_commands_apply_in_order() {
    let session = spawn_with(Arc::new(MemoryStorage::new()), SessionConfig::default());
    let handle = session.handle();

    handle.set("stroke.weight", 2).await.unwrap();
    handle.set("stroke.weight", 5).await.unwrap();
    handle.set("stroke.color", "#123456").await.unwrap();

    let config = handle.snapshot().await.unwrap();
    assert_eq!(config.stroke.weight, 5);
    assert_eq!(config.stroke.color, "#123456");
    session.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_autosave_coalesces_to_last_snapshot() {
    let storage = Arc::new(SlowStorage::default());
    let session = spawn_with(storage.clone(), SessionConfig::default());
    let handle = session.handle();

    for radius in 1..=10 {
        handle.set("button.radius", radius).await.unwrap();
    }
    session.shutdown().await.unwrap();

    let writes = storage.writes.load(Ordering::SeqCst);
    assert!(writes >= 1 && writes < 10, "writes = {}", writes);
    let last = storage.last.lock().unwrap().clone().unwrap();
    assert!(last.contains("\"radius\":10"));
}

#[tokio::test]
async fn test_import_error_leaves_session_state() {
    let session = spawn_with(Arc::new(MemoryStorage::new()), SessionConfig::default());
    let handle = session.handle();
    handle.set("layout", "layout2").await.unwrap();

    let err = handle.import(b"[\"not\", \"an\", \"object\"]".to_vec()).await.unwrap_err();
    assert!(matches!(err, SessionError::Import(_)));
    assert!(err.to_string().starts_with("Invalid JSON file"));
    assert_eq!(handle.snapshot().await.unwrap().layout, Layout::Layout2);

    let imported = handle.import(br#"{"gallery":{"spacing":2}}"#.to_vec()).await.unwrap();
    assert_eq!(imported.gallery.spacing, 2);
    assert_eq!(imported.layout, Layout::Layout2);
    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_export_and_reset() {
    let storage = Arc::new(MemoryStorage::new());
    let session = spawn_with(storage.clone(), SessionConfig::default());
    let handle = session.handle();

    handle.set("layout", "layout2").await.unwrap();
    let document = handle.export().await.unwrap();
    assert_eq!(document.suggested_name, "ui-config-layout2.json");

    let config = handle.reset().await.unwrap();
    assert_eq!(*config, Configuration::default());
    session.shutdown().await.unwrap();

    let saved = storage.read(STORAGE_KEY).unwrap().unwrap();
    assert!(saved.contains("\"layout\":\"layout1\""));
}

#[tokio::test]
async fn test_preview_follows_layout() {
    let temp_dir = TempDir::new().unwrap();
    let preview = temp_dir.path().join("preview.html");
    let session = spawn_with(
        Arc::new(MemoryStorage::new()),
        SessionConfig {
            preview_path: Some(preview.clone()),
            ..SessionConfig::default()
        },
    );
    let handle = session.handle();

    handle.snapshot().await.unwrap();
    let initial = std::fs::read_to_string(&preview).unwrap();
    assert!(initial.contains("data-layout=\"layout1\""));

    let mut events = handle.subscribe();
    handle.set("layout", "layout2").await.unwrap();
    session.shutdown().await.unwrap();

    let mut switched = false;
    while let Ok(event) = events.try_recv() {
        if let SessionEvent::PresenterChanged { from, to } = event {
            assert_eq!((from, to), (Layout::Layout1, Layout::Layout2));
            switched = true;
        }
    }
    assert!(switched);
    let html = std::fs::read_to_string(&preview).unwrap();
    assert!(html.contains("data-layout=\"layout2\""));
    assert!(html.contains("Content Gallery"));
}

#[tokio::test]
async fn test_rejected_mutation_emits_no_events() {
    let session = spawn_with(Arc::new(MemoryStorage::new()), SessionConfig::default());
    let handle = session.handle();
    let mut events = handle.subscribe();

    assert!(handle.set("button.shadow", "xl").await.is_err());
    assert!(handle.set("button.radius", 12).await.is_ok());
    session.shutdown().await.unwrap();

    assert!(events.try_recv().is_err());
}
