//! Persistence adapter for the style configuration
//!
//! Loads the last saved configuration at startup, saves after every accepted
//! change, and produces/consumes the export document. The storage behind it is
//! an opaque key-value service.

use crate::config::parser::{self, ImportError};
use crate::models::Configuration;
use crate::services::config_store::{ConfigStore, SubscriptionId};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Key the configuration document is stored under
pub const STORAGE_KEY: &str = "ui-cfg";

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Lock error: {message}")]
    LockError { message: String },
}

/// Opaque key-value storage service
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStorage: Send + Sync {
    /// Contents stored under `key`, or `None` if nothing was saved yet
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn write(&self, key: &str, contents: &str) -> Result<(), PersistenceError>;
}

#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    pub storage_dir: PathBuf,
    pub atomic_writes: bool,
    pub file_permissions: u32,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            storage_dir: data_dir.join("dynui"),
            atomic_writes: true,
            file_permissions: 0o600, // Read/write for owner only
        }
    }
}

/// Stores each key as `<storage_dir>/<key>.json`
pub struct FileStorage {
    config: PersistenceConfig,
}

impl FileStorage {
    pub fn new(config: PersistenceConfig) -> Self {
        Self { config }
    }

    pub fn in_dir(storage_dir: impl Into<PathBuf>) -> Self {
        Self::new(PersistenceConfig {
            storage_dir: storage_dir.into(),
            ..PersistenceConfig::default()
        })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.config.storage_dir.join(format!("{}.json", key))
    }

    fn write_file_atomic(&self, file_path: &Path, content: &str) -> Result<(), PersistenceError> {
        let target = if self.config.atomic_writes {
            file_path.with_extension("tmp")
        } else {
            file_path.to_path_buf()
        };

        fs::write(&target, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(self.config.file_permissions);
            fs::set_permissions(&target, permissions)?;
        }

        if target != file_path {
            fs::rename(target, file_path)?;
        }
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.config.storage_dir)?;
        self.write_file_atomic(&self.path_for(key), contents)
    }
}

/// Process-local storage for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, contents: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut entries) = storage.entries.lock() {
            entries.insert(key.to_string(), contents.to_string());
        }
        storage
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let entries = self.entries.lock().map_err(|e| PersistenceError::LockError {
            message: e.to_string(),
        })?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), PersistenceError> {
        let mut entries = self.entries.lock().map_err(|e| PersistenceError::LockError {
            message: e.to_string(),
        })?;
        entries.insert(key.to_string(), contents.to_string());
        Ok(())
    }
}

/// A downloadable copy of the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub bytes: Vec<u8>,
    /// `ui-config-<layout>.json`
    pub suggested_name: String,
}

impl ExportDocument {
    /// Write the document into `dir` under its suggested name
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, PersistenceError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.suggested_name);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

pub struct PersistenceAdapter {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl PersistenceAdapter {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            key: STORAGE_KEY.to_string(),
        }
    }

    pub fn with_key(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Last saved configuration, or the default when nothing usable is stored
    ///
    /// Stored documents go through the same merge as imports, so a partial
    /// document is completed with defaults.
    pub fn load(&self) -> Configuration {
        let contents = match self.storage.read(&self.key) {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                info!(key = %self.key, "No saved configuration, starting from defaults");
                return Configuration::default();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read saved configuration, using defaults");
                return Configuration::default();
            }
        };

        match parser::parse_document(contents.as_bytes()) {
            Ok(document) => {
                let report = parser::merge_document(&Configuration::default(), &document);
                info!(key = %self.key, sections = report.replaced.len(), "Loaded saved configuration");
                report.config
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Saved configuration is corrupt, using defaults");
                Configuration::default()
            }
        }
    }

    pub fn save(&self, config: &Configuration) -> Result<(), PersistenceError> {
        let contents = config.to_json()?;
        self.storage.write(&self.key, &contents)?;
        debug!(key = %self.key, bytes = contents.len(), "Saved configuration");
        Ok(())
    }

    /// Save without surfacing failures; editing continues either way
    pub fn save_logged(&self, config: &Configuration) {
        if let Err(e) = self.save(config) {
            warn!(key = %self.key, error = %e, "Failed to save configuration");
        }
    }

    pub fn export_document(&self, config: &Configuration) -> Result<ExportDocument, PersistenceError> {
        let bytes = config.to_json_pretty()?.into_bytes();
        Ok(ExportDocument {
            bytes,
            suggested_name: format!("ui-config-{}.json", config.layout),
        })
    }

    /// Parse `bytes` and merge them into `store`
    ///
    /// On any parse failure the store is left untouched.
    pub fn import_document(
        &self,
        store: &mut ConfigStore,
        bytes: &[u8],
    ) -> Result<Arc<Configuration>, ImportError> {
        let document = parser::parse_document(bytes)?;
        Ok(store.import_merge(&document))
    }

    /// Save every accepted store change from now on
    pub fn attach(self: &Arc<Self>, store: &mut ConfigStore) -> SubscriptionId {
        let adapter = Arc::clone(self);
        store.subscribe(move |_event, snapshot| adapter.save_logged(snapshot))
    }
}
