//! DynUI - configuration-driven style editor with live HTML preview
//!
//! A single [`Configuration`] value describes a page's typography, buttons,
//! gallery, container and borders. Edits arrive as `(path, value)` pairs, are
//! validated against a static field table and produce a new immutable
//! snapshot. Snapshots are persisted, exported and imported as JSON, and
//! rendered by one of two layout presenters.

pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod services;
pub mod ui;

pub use models::*;
pub use services::*;

/// Result type alias for DynUI operations
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the DynUI application layer
#[derive(thiserror::Error, Debug)]
pub enum DynUiError {
    #[error("Confirmation required: {0}")]
    ConfirmationRequired(String),
}
