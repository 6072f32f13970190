//! Style configuration model for DynUI
//!
//! A fixed two-level tree: the top-level `layout` choice plus five sections of
//! scalar leaf fields. Sections sit behind `Arc` so that a new snapshot only
//! duplicates the section that actually changed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Font stacks offered by the typography editor.
pub const FONT_STACKS: &[&str] = &[
    "Inter, system-ui, -apple-system, Segoe UI, Roboto, sans-serif",
    "Roboto, system-ui, -apple-system, Segoe UI, Inter, sans-serif",
    "Poppins, system-ui, -apple-system, Segoe UI, Inter, sans-serif",
];

/// Error returned when an identifier does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// Declares a lowercase identifier enum with its name table and parsing.
macro_rules! identifier_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $ident:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every identifier accepted for this field, in display order
            pub const NAMES: &'static [&'static str] = &[$($ident),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $ident ),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $ident => Ok($name::$variant), )+
                    _ => Err(UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                        expected: Self::NAMES.join(", "),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

identifier_enum! {
    /// Which preview template renders the configuration
    Layout, "layout" {
        #[default]
        Layout1 => "layout1",
        Layout2 => "layout2",
    }
}

identifier_enum! {
    /// Drop shadow preset for the primary button
    Shadow, "shadow" {
        None => "none",
        Sm => "sm",
        #[default]
        Md => "md",
        Lg => "lg",
    }
}

identifier_enum! {
    /// Horizontal alignment of a row of elements
    Align, "alignment" {
        Left => "left",
        #[default]
        Center => "center",
        Right => "right",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub family: String,
    pub weight: u16,
    /// Base font size in pixels
    pub size: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonStyle {
    pub radius: u16,
    pub shadow: Shadow,
    pub align: Align,
    pub bg: String,
    pub color: String,
    pub stroke_color: String,
    pub stroke_weight: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryStyle {
    pub align: Align,
    pub spacing: u16,
    pub radius: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralStyle {
    pub card_radius: u16,
    pub container_padding: u16,
    pub section_bg: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeStyle {
    pub color: String,
    pub weight: u16,
}

/// The complete, always fully populated editor state
///
/// Never mutated in place once shared: the store swaps in a new value and
/// previously handed-out snapshots stay valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub layout: Layout,
    pub typography: Arc<Typography>,
    pub button: Arc<ButtonStyle>,
    pub gallery: Arc<GalleryStyle>,
    pub general: Arc<GeneralStyle>,
    pub stroke: Arc<StrokeStyle>,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            family: FONT_STACKS[0].to_string(),
            weight: 600,
            size: 20,
        }
    }
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            radius: 12,
            shadow: Shadow::Md,
            align: Align::Center,
            bg: "#111827".to_string(),
            color: "#ffffff".to_string(),
            stroke_color: "#111827".to_string(),
            stroke_weight: 0,
        }
    }
}

impl Default for GalleryStyle {
    fn default() -> Self {
        Self {
            align: Align::Center,
            spacing: 12,
            radius: 12,
        }
    }
}

impl Default for GeneralStyle {
    fn default() -> Self {
        Self {
            card_radius: 16,
            container_padding: 24,
            section_bg: "#ffffff".to_string(),
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: "#e5e7eb".to_string(),
            weight: 1,
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            typography: Arc::default(),
            button: Arc::default(),
            gallery: Arc::default(),
            general: Arc::default(),
            stroke: Arc::default(),
        }
    }
}

impl Configuration {
    /// Serialize to the compact JSON document used for persisted state
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize to the two-space indented JSON used for exports
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// True when both configurations share the given section allocation
    pub fn shares_section(&self, other: &Configuration, section: &str) -> bool {
        match section {
            "typography" => Arc::ptr_eq(&self.typography, &other.typography),
            "button" => Arc::ptr_eq(&self.button, &other.button),
            "gallery" => Arc::ptr_eq(&self.gallery, &other.gallery),
            "general" => Arc::ptr_eq(&self.general, &other.general),
            "stroke" => Arc::ptr_eq(&self.stroke, &other.stroke),
            _ => false,
        }
    }
}
