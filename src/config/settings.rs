//! Application settings for the `dynui` binary
//!
//! Read from `<config_dir>/dynui/settings.toml`. Every key is optional and
//! command-line flags win over the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Directory holding the stored configuration document
    pub storage_dir: PathBuf,
    /// Where the preview HTML goes; `<storage_dir>/preview.html` when unset
    pub preview_path: Option<PathBuf>,
    /// Save after every accepted change
    pub autosave: bool,
    /// Default destination for `export`
    pub export_dir: PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            storage_dir: data_dir.join("dynui"),
            preview_path: None,
            autosave: true,
            export_dir: PathBuf::from("."),
        }
    }
}

impl AppSettings {
    /// `<config_dir>/dynui/settings.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dynui").join("settings.toml"))
    }

    /// Load from `path`, or from [`Self::default_path`] when `None`
    ///
    /// A missing file yields the defaults; a present but malformed file is an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => return Ok(Self::default()),
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(SettingsError::IoError { path, source }),
        };

        toml::from_str(&content).map_err(|source| SettingsError::ParseError { path, source })
    }

    pub fn preview_path(&self) -> PathBuf {
        self.preview_path
            .clone()
            .unwrap_or_else(|| self.storage_dir.join("preview.html"))
    }
}
