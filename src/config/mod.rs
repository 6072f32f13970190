//! Configuration schema, validation, import parsing and persistence for DynUI

pub mod parser;
pub mod persistence;
pub mod schema;
pub mod settings;
pub mod validator;

pub use parser::{merge_document, parse_document, ImportError, MergeReport};
pub use persistence::{
    ExportDocument, FileStorage, KeyValueStorage, MemoryStorage, PersistenceAdapter,
    PersistenceConfig, PersistenceError, STORAGE_KEY,
};
pub use schema::{lookup, Constraint, FieldSpec, PathError, SECTIONS};
pub use settings::{AppSettings, SettingsError};
pub use validator::{
    coerce, normalize, validate_document, Coerced, ValidationError, ValidationIssue, ValidationSeverity,
};
