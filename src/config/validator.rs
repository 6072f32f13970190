//! Constraint checking for field values
//!
//! Shared by the path mutator (one widget value at a time) and the import
//! merge (whole documents). Out-of-range numbers are clamped rather than
//! rejected; values of the wrong kind are rejected.

use crate::config::schema::{self, Constraint, FieldSpec};
use crate::models::{Configuration, FieldValue};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{path}: expected a number, got {found}")]
    NotANumber { path: String, found: String },
    #[error("{path}: {value} is not a finite number")]
    NotFinite { path: String, value: String },
    #[error("{path}: '{value}' is not one of: {allowed}")]
    NotAllowed {
        path: String,
        value: String,
        allowed: String,
    },
    #[error("{path}: expected text, got {found}")]
    ExpectedText { path: String, found: &'static str },
}

/// A value that satisfies its field constraint
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub value: FieldValue,
    /// The input had to be truncated, clamped or snapped to fit
    pub adjusted: bool,
}

/// Validate `value` against the constraint of `spec`, clamping numbers into range
pub fn coerce(spec: &FieldSpec, value: &FieldValue) -> Result<Coerced, ValidationError> {
    match spec.constraint {
        Constraint::Integer { min, max, step } => {
            let raw = numeric(spec.path, value)?;
            let truncated = raw.trunc();
            let clamped = snap(truncated as i64, min, max, step);
            Ok(Coerced {
                adjusted: clamped as f64 != raw,
                value: FieldValue::Integer(clamped),
            })
        }
        Constraint::Choice(options) => {
            let text = expect_text(spec.path, value)?;
            if options.contains(&text) {
                Ok(Coerced {
                    value: FieldValue::Text(text.to_string()),
                    adjusted: false,
                })
            } else {
                Err(ValidationError::NotAllowed {
                    path: spec.path.to_string(),
                    value: text.to_string(),
                    allowed: options.join(", "),
                })
            }
        }
        Constraint::Color => {
            let text = expect_text(spec.path, value)?;
            Ok(Coerced {
                value: FieldValue::Text(text.to_string()),
                adjusted: false,
            })
        }
    }
}

fn numeric(path: &str, value: &FieldValue) -> Result<f64, ValidationError> {
    let number = match value {
        FieldValue::Integer(i) => *i as f64,
        FieldValue::Number(n) => *n,
        FieldValue::Text(s) => s.trim().parse::<f64>().map_err(|_| ValidationError::NotANumber {
            path: path.to_string(),
            found: format!("'{}'", s),
        })?,
    };

    if number.is_finite() {
        Ok(number)
    } else {
        Err(ValidationError::NotFinite {
            path: path.to_string(),
            value: value.to_string(),
        })
    }
}

fn expect_text<'a>(path: &str, value: &'a FieldValue) -> Result<&'a str, ValidationError> {
    value.as_text().ok_or_else(|| ValidationError::ExpectedText {
        path: path.to_string(),
        found: value.kind(),
    })
}

/// Clamp into `[min, max]` and move onto the step grid anchored at `min`
fn snap(value: i64, min: i64, max: i64, step: i64) -> i64 {
    let clamped = value.clamp(min, max);
    if step <= 1 {
        return clamped;
    }

    let offset = clamped - min;
    let remainder = offset % step;
    let snapped = if remainder * 2 >= step {
        offset - remainder + step
    } else {
        offset - remainder
    };
    (min + snapped).min(max)
}

/// Bring every field of `config` within its constraint
///
/// Numbers are clamped and snapped, rejected values take the field default.
/// Sections whose fields already conform keep their allocation. Returns the
/// paths that were rewritten.
pub fn normalize(config: &mut Configuration) -> Vec<&'static str> {
    let mut rewritten = Vec::new();

    for spec in schema::fields() {
        let current = spec.read(config);
        let value = match coerce(spec, &current) {
            Ok(coerced) => coerced.value,
            Err(_) => spec.default_value(),
        };
        if value == current {
            continue;
        }

        debug!(path = spec.path, from = %current, to = %value, "Normalizing out-of-range field");
        if spec.write(config, &value).is_some() {
            rewritten.push(spec.path);
        }
    }

    rewritten
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    /// The value will be replaced by the field default on import
    Error,
    /// The value will be adjusted or ignored on import
    Warning,
}

/// A finding from checking an import document without applying it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
    pub severity: ValidationSeverity,
}

impl ValidationIssue {
    fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: ValidationSeverity::Error,
        }
    }

    fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: ValidationSeverity::Warning,
        }
    }
}

/// Report how an import document would be interpreted
///
/// Mirrors the import merge: unknown sections and keys are ignored, malformed
/// values fall back to defaults, out-of-range numbers are clamped.
pub fn validate_document(document: &Map<String, Value>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (key, value) in document {
        if key == "layout" {
            if let Some(spec) = schema::fields().iter().find(|spec| spec.section.is_none()) {
                check_value(spec, value, &mut issues);
            }
            continue;
        }

        if !schema::is_section(key) {
            issues.push(ValidationIssue::warning(key, "unknown section is ignored"));
            continue;
        }

        let Some(section) = value.as_object() else {
            issues.push(ValidationIssue::error(
                key,
                "section is not an object; every field falls back to its default",
            ));
            continue;
        };

        for spec in schema::section_fields(key) {
            match section.get(spec.key) {
                Some(field) => check_value(spec, field, &mut issues),
                None => issues.push(ValidationIssue::warning(
                    spec.path,
                    format!("missing; default {} is used", spec.default_value()),
                )),
            }
        }

        for extra in section.keys() {
            if !schema::section_fields(key).any(|spec| spec.key == extra) {
                issues.push(ValidationIssue::warning(
                    format!("{}.{}", key, extra),
                    "unknown field is ignored",
                ));
            }
        }
    }

    issues
}

fn check_value(spec: &FieldSpec, value: &Value, issues: &mut Vec<ValidationIssue>) {
    let Some(field_value) = FieldValue::from_json(value) else {
        issues.push(ValidationIssue::error(
            spec.path,
            format!("{} is not a scalar; default {} is used", value, spec.default_value()),
        ));
        return;
    };

    match coerce(spec, &field_value) {
        Ok(coerced) if coerced.adjusted => issues.push(ValidationIssue::warning(
            spec.path,
            format!("{} is adjusted to {} ({})", field_value, coerced.value, spec.constraint),
        )),
        Ok(_) => {}
        Err(e) => issues.push(ValidationIssue::error(
            spec.path,
            format!("{}; default {} is used", e, spec.default_value()),
        )),
    }
}
