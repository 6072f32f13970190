//! Dotted field addresses

use std::fmt;
use std::str::FromStr;

/// A sequence of section/field identifiers such as `button.radius`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Canonical dotted form used as the schema lookup key
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl FromStr for FieldPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FieldPath::from(s))
    }
}

impl From<&str> for FieldPath {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Self { segments: Vec::new() };
        }
        Self::new(trimmed.split('.').map(str::trim))
    }
}

impl From<&[&str]> for FieldPath {
    fn from(value: &[&str]) -> Self {
        Self::new(value.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for FieldPath {
    fn from(value: [&str; N]) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}
