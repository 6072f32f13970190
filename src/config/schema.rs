//! Field table for the style configuration
//!
//! Every editable leaf is described once here: its dotted path, its constraint
//! and a getter/setter pair. The path mutator, the import merge and the CLI
//! field listing all go through this table instead of per-field code.

use crate::models::{
    Align, Configuration, FieldPath, FieldValue, Layout, Shadow, FONT_STACKS,
};
use std::fmt;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Top-level sections holding leaf fields, in document order
pub const SECTIONS: &[&str] = &["typography", "button", "gallery", "general", "stroke"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("empty field path")]
    Empty,
    #[error("unknown field path '{0}'")]
    UnknownPath(String),
    #[error("'{0}' is a section, not a field; address one of its fields instead")]
    NotALeaf(String),
}

/// Constraint attached to a leaf field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Whole pixels (or font weight units) within `[min, max]` on a `step` grid from `min`
    Integer { min: i64, max: i64, step: i64 },
    /// Exactly one of the listed identifiers
    Choice(&'static [&'static str]),
    /// Opaque colour string, stored verbatim
    Color,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Integer { min, max, step } if *step > 1 => {
                write!(f, "integer {}..={} step {}", min, max, step)
            }
            Constraint::Integer { min, max, .. } => write!(f, "integer {}..={}", min, max),
            Constraint::Choice(options) => write!(f, "one of [{}]", options.join(" | ")),
            Constraint::Color => f.write_str("color"),
        }
    }
}

type Reader = fn(&Configuration) -> FieldValue;
type Writer = fn(&mut Configuration, &FieldValue) -> Option<()>;

/// One row of the field table
pub struct FieldSpec {
    /// Dotted address, e.g. `button.strokeWeight`
    pub path: &'static str,
    /// Owning section, `None` for the top-level `layout` field
    pub section: Option<&'static str>,
    /// Key inside the section object
    pub key: &'static str,
    pub constraint: Constraint,
    read: Reader,
    write: Writer,
}

impl FieldSpec {
    /// Current value of this field in `config`
    pub fn read(&self, config: &Configuration) -> FieldValue {
        (self.read)(config)
    }

    /// Store an already validated value, copying only the owning section
    ///
    /// Returns `None` when the value does not have the shape the field
    /// stores; validated values always do.
    pub fn write(&self, config: &mut Configuration, value: &FieldValue) -> Option<()> {
        (self.write)(config, value)
    }

    pub fn default_value(&self) -> FieldValue {
        self.read(&Configuration::default())
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("path", &self.path)
            .field("constraint", &self.constraint)
            .finish()
    }
}

const fn px(min: i64, max: i64) -> Constraint {
    Constraint::Integer { min, max, step: 1 }
}

fn text(value: &FieldValue) -> Option<String> {
    value.as_text().map(str::to_string)
}

fn build_table() -> Vec<FieldSpec> {
    vec![
        FieldSpec {
            path: "layout",
            section: None,
            key: "layout",
            constraint: Constraint::Choice(Layout::NAMES),
            read: |c| c.layout.as_str().into(),
            write: |c, v| {
                c.layout = v.as_text()?.parse().ok()?;
                Some(())
            },
        },
        FieldSpec {
            path: "typography.family",
            section: Some("typography"),
            key: "family",
            constraint: Constraint::Choice(FONT_STACKS),
            read: |c| c.typography.family.as_str().into(),
            write: |c, v| {
                Arc::make_mut(&mut c.typography).family = text(v)?;
                Some(())
            },
        },
        FieldSpec {
            path: "typography.weight",
            section: Some("typography"),
            key: "weight",
            constraint: Constraint::Integer { min: 400, max: 900, step: 100 },
            read: |c| i64::from(c.typography.weight).into(),
            write: |c, v| {
                Arc::make_mut(&mut c.typography).weight = v.as_u16()?;
                Some(())
            },
        },
        FieldSpec {
            path: "typography.size",
            section: Some("typography"),
            key: "size",
            constraint: px(10, 60),
            read: |c| i64::from(c.typography.size).into(),
            write: |c, v| {
                Arc::make_mut(&mut c.typography).size = v.as_u16()?;
                Some(())
            },
        },
        FieldSpec {
            path: "button.radius",
            section: Some("button"),
            key: "radius",
            constraint: px(0, 48),
            read: |c| i64::from(c.button.radius).into(),
            write: |c, v| {
                Arc::make_mut(&mut c.button).radius = v.as_u16()?;
                Some(())
            },
        },
        FieldSpec {
            path: "button.shadow",
            section: Some("button"),
            key: "shadow",
            constraint: Constraint::Choice(Shadow::NAMES),
            read: |c| c.button.shadow.as_str().into(),
            write: |c, v| {
                Arc::make_mut(&mut c.button).shadow = v.as_text()?.parse().ok()?;
                Some(())
            },
        },
        FieldSpec {
            path: "button.align",
            section: Some("button"),
            key: "align",
            constraint: Constraint::Choice(Align::NAMES),
            read: |c| c.button.align.as_str().into(),
            write: |c, v| {
                Arc::make_mut(&mut c.button).align = v.as_text()?.parse().ok()?;
                Some(())
            },
        },
        FieldSpec {
            path: "button.bg",
            section: Some("button"),
            key: "bg",
            constraint: Constraint::Color,
            read: |c| c.button.bg.as_str().into(),
            write: |c, v| {
                Arc::make_mut(&mut c.button).bg = text(v)?;
                Some(())
            },
        },
        FieldSpec {
            path: "button.color",
            section: Some("button"),
            key: "color",
            constraint: Constraint::Color,
            read: |c| c.button.color.as_str().into(),
            write: |c, v| {
                Arc::make_mut(&mut c.button).color = text(v)?;
                Some(())
            },
        },
        FieldSpec {
            path: "button.strokeColor",
            section: Some("button"),
            key: "strokeColor",
            constraint: Constraint::Color,
            read: |c| c.button.stroke_color.as_str().into(),
            write: |c, v| {
                Arc::make_mut(&mut c.button).stroke_color = text(v)?;
                Some(())
            },
        },
        FieldSpec {
            path: "button.strokeWeight",
            section: Some("button"),
            key: "strokeWeight",
            constraint: px(0, 6),
            read: |c| i64::from(c.button.stroke_weight).into(),
            write: |c, v| {
                Arc::make_mut(&mut c.button).stroke_weight = v.as_u16()?;
                Some(())
            },
        },
        FieldSpec {
            path: "gallery.align",
            section: Some("gallery"),
            key: "align",
            constraint: Constraint::Choice(Align::NAMES),
            read: |c| c.gallery.align.as_str().into(),
            write: |c, v| {
                Arc::make_mut(&mut c.gallery).align = v.as_text()?.parse().ok()?;
                Some(())
            },
        },
        FieldSpec {
            path: "gallery.spacing",
            section: Some("gallery"),
            key: "spacing",
            constraint: px(0, 48),
            read: |c| i64::from(c.gallery.spacing).into(),
            write: |c, v| {
                Arc::make_mut(&mut c.gallery).spacing = v.as_u16()?;
                Some(())
            },
        },
        FieldSpec {
            path: "gallery.radius",
            section: Some("gallery"),
            key: "radius",
            constraint: px(0, 48),
            read: |c| i64::from(c.gallery.radius).into(),
            write: |c, v| {
                Arc::make_mut(&mut c.gallery).radius = v.as_u16()?;
                Some(())
            },
        },
        FieldSpec {
            path: "general.cardRadius",
            section: Some("general"),
            key: "cardRadius",
            constraint: px(0, 48),
            read: |c| i64::from(c.general.card_radius).into(),
            write: |c, v| {
                Arc::make_mut(&mut c.general).card_radius = v.as_u16()?;
                Some(())
            },
        },
        FieldSpec {
            path: "general.containerPadding",
            section: Some("general"),
            key: "containerPadding",
            constraint: px(0, 64),
            read: |c| i64::from(c.general.container_padding).into(),
            write: |c, v| {
                Arc::make_mut(&mut c.general).container_padding = v.as_u16()?;
                Some(())
            },
        },
        FieldSpec {
            path: "general.sectionBg",
            section: Some("general"),
            key: "sectionBg",
            constraint: Constraint::Color,
            read: |c| c.general.section_bg.as_str().into(),
            write: |c, v| {
                Arc::make_mut(&mut c.general).section_bg = text(v)?;
                Some(())
            },
        },
        FieldSpec {
            path: "stroke.color",
            section: Some("stroke"),
            key: "color",
            constraint: Constraint::Color,
            read: |c| c.stroke.color.as_str().into(),
            write: |c, v| {
                Arc::make_mut(&mut c.stroke).color = text(v)?;
                Some(())
            },
        },
        FieldSpec {
            path: "stroke.weight",
            section: Some("stroke"),
            key: "weight",
            constraint: px(0, 6),
            read: |c| i64::from(c.stroke.weight).into(),
            write: |c, v| {
                Arc::make_mut(&mut c.stroke).weight = v.as_u16()?;
                Some(())
            },
        },
    ]
}

static FIELDS: OnceLock<Vec<FieldSpec>> = OnceLock::new();

/// All editable fields in document order
pub fn fields() -> &'static [FieldSpec] {
    FIELDS.get_or_init(build_table)
}

pub fn sections() -> &'static [&'static str] {
    SECTIONS
}

pub fn is_section(name: &str) -> bool {
    SECTIONS.contains(&name)
}

/// Leaf fields belonging to `section`
pub fn section_fields(section: &str) -> impl Iterator<Item = &'static FieldSpec> + '_ {
    fields().iter().filter(move |spec| spec.section == Some(section))
}

/// Resolve a path to exactly one leaf field
pub fn lookup(path: &FieldPath) -> Result<&'static FieldSpec, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let dotted = path.dotted();
    if let Some(spec) = fields().iter().find(|spec| spec.path == dotted) {
        return Ok(spec);
    }

    match path.segments() {
        [only] if is_section(only) => Err(PathError::NotALeaf(dotted)),
        _ => Err(PathError::UnknownPath(dotted)),
    }
}
