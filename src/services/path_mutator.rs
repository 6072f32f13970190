//! Generic path-addressed mutation of the configuration
//!
//! One code path serves every leaf field: resolve the path through the schema
//! table, validate and clamp the value, then write it into a copy of the
//! configuration. Only the addressed section is cloned; every other section is
//! shared with the input.

use crate::config::schema::{self, PathError};
use crate::config::validator::{self, ValidationError};
use crate::models::{Configuration, FieldPath, FieldValue};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{path}: field rejected value {value}")]
    Unwritable { path: String, value: String },
}

/// Outcome of a successful mutation
#[derive(Debug, Clone)]
pub struct Mutation {
    pub config: Configuration,
    pub previous: FieldValue,
    /// Value actually stored after clamping
    pub written: FieldValue,
    pub adjusted: bool,
}

/// Return a copy of `config` with the leaf at `path` set to `value`
pub fn apply(
    config: &Configuration,
    path: &FieldPath,
    value: &FieldValue,
) -> Result<Configuration, MutationError> {
    apply_detailed(config, path, value).map(|mutation| mutation.config)
}

/// Like [`apply`], also reporting the previous and stored values
pub fn apply_detailed(
    config: &Configuration,
    path: &FieldPath,
    value: &FieldValue,
) -> Result<Mutation, MutationError> {
    let spec = schema::lookup(path)?;
    let coerced = validator::coerce(spec, value)?;
    let previous = spec.read(config);

    let mut next = config.clone();
    spec.write(&mut next, &coerced.value)
        .ok_or_else(|| MutationError::Unwritable {
            path: spec.path.to_string(),
            value: coerced.value.to_string(),
        })?;

    Ok(Mutation {
        config: next,
        previous,
        written: coerced.value,
        adjusted: coerced.adjusted,
    })
}
