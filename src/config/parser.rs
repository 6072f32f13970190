//! Document parsing and section-level merge
//!
//! Imported and persisted documents are plain JSON objects shaped like
//! [`Configuration`]. They may be partial or carry junk; the merge below turns
//! any object into a complete configuration.

use crate::config::schema::{self, FieldSpec};
use crate::config::validator;
use crate::models::{Configuration, FieldValue};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Invalid JSON file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid JSON file: expected an object at the top level, found {found}")]
    Shape { found: &'static str },
}

/// Parse bytes into a top-level JSON object
pub fn parse_document(bytes: &[u8]) -> Result<Map<String, Value>, ImportError> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(map) => Ok(map),
        other => Err(ImportError::Shape {
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Result of overlaying a document onto a configuration
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub config: Configuration,
    /// Top-level keys taken from the document, in document order
    pub replaced: Vec<String>,
    /// Top-level keys that are not part of the configuration
    pub ignored: Vec<String>,
}

/// Overlay `partial` onto `base` one top-level section at a time
///
/// A section present in the document replaces the whole section: fields it
/// leaves out, or gives unusable values, take the schema default rather than
/// the value from `base`. Sections absent from the document keep `base`'s
/// allocation untouched.
pub fn merge_document(base: &Configuration, partial: &Map<String, Value>) -> MergeReport {
    let mut config = base.clone();
    let mut replaced = Vec::new();
    let mut ignored = Vec::new();

    for (key, value) in partial {
        if key == "layout" {
            if let Some(spec) = schema::fields().iter().find(|spec| spec.section.is_none()) {
                write_or_default(&mut config, spec, Some(value));
                replaced.push(key.clone());
            }
        } else if schema::is_section(key) {
            let section = value.as_object();
            if section.is_none() {
                debug!(section = %key, "Imported section is not an object, using defaults");
            }
            for spec in schema::section_fields(key) {
                write_or_default(&mut config, spec, section.and_then(|s| s.get(spec.key)));
            }
            replaced.push(key.clone());
        } else {
            debug!(section = %key, "Dropping unknown top-level section");
            ignored.push(key.clone());
        }
    }

    MergeReport {
        config,
        replaced,
        ignored,
    }
}

fn write_or_default(config: &mut Configuration, spec: &FieldSpec, value: Option<&Value>) {
    let accepted = value.and_then(|raw| {
        let field_value = FieldValue::from_json(raw)?;
        match validator::coerce(spec, &field_value) {
            Ok(coerced) => Some(coerced.value),
            Err(e) => {
                debug!(path = spec.path, error = %e, "Falling back to default");
                None
            }
        }
    });

    let value = accepted.unwrap_or_else(|| spec.default_value());
    if spec.write(config, &value).is_none() {
        debug!(path = spec.path, "Stored value rejected by field writer");
    }
}
