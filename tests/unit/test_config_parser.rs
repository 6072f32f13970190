//! Unit tests for import document parsing and validation
//!
//! Covers top-level shape checks, the section-level merge and the dry-run
//! report used by `dynui validate`.

use dynui::{
    config::{
        merge_document, parse_document, validate_document, ImportError, ValidationSeverity,
    },
    models::{Align, Configuration, Layout, Shadow},
};
use serde_json::json;

fn merged(document: serde_json::Value) -> Configuration {
    merge_document(&Configuration::default(), document.as_object().unwrap()).config
}

#[test]
fn test_non_object_documents_are_shape_errors() {
    let inputs: [&[u8]; 5] = [b"[]", b"null", b"\"layout1\"", b"3.5", b"true"];
    for input in inputs {
        assert!(
            matches!(parse_document(input), Err(ImportError::Shape { .. })),
            "{}",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn test_invalid_json_is_a_parse_error() {
    assert!(matches!(parse_document(b""), Err(ImportError::Parse(_))));
    assert!(matches!(parse_document(b"{\"layout\": }"), Err(ImportError::Parse(_))));
}

#[test]
fn test_empty_document_changes_nothing() {
    let base = Configuration::default();
    let report = merge_document(&base, &parse_document(b"{}").unwrap());

    assert_eq!(report.config, base);
    assert!(report.replaced.is_empty());
    assert!(report.ignored.is_empty());
}

#[test]
fn test_full_document_with_numeric_strings() {
    let config = merged(json!({
        "layout": "layout2",
        "typography": {"family": dynui::models::FONT_STACKS[1], "weight": "700", "size": "18"},
        "button": {
            "radius": 4, "shadow": "none", "align": "left",
            "bg": "#fff", "color": "#000", "strokeColor": "#333", "strokeWeight": 2
        },
        "gallery": {"align": "right", "spacing": 24, "radius": 0},
        "general": {"cardRadius": 8, "containerPadding": 12, "sectionBg": "#fafafa"},
        "stroke": {"color": "#ccc", "weight": 3}
    }));

    assert_eq!(config.layout, Layout::Layout2);
    assert_eq!(config.typography.weight, 700);
    assert_eq!(config.typography.size, 18);
    assert_eq!(config.button.shadow, Shadow::None);
    assert_eq!(config.button.align, Align::Left);
    assert_eq!(config.button.stroke_color, "#333");
    assert_eq!(config.gallery.align, Align::Right);
    assert_eq!(config.general.section_bg, "#fafafa");
    assert_eq!(config.stroke.weight, 3);
}

#[test]
fn test_unknown_fields_inside_sections_are_dropped() {
    let config = merged(json!({"gallery": {"spacing": 20, "columns": 4}}));
    assert_eq!(config.gallery.spacing, 20);
    assert_eq!(config.gallery.radius, 12);
}

#[test]
fn test_booleans_and_nested_values_fall_back() {
    let config = merged(json!({"button": {"radius": true, "bg": {"hex": "#fff"}, "shadow": "sm"}}));
    let defaults = Configuration::default();

    assert_eq!(config.button.radius, defaults.button.radius);
    assert_eq!(config.button.bg, defaults.button.bg);
    assert_eq!(config.button.shadow, Shadow::Sm);
}

#[test]
fn test_validate_reports_without_applying() {
    let document = parse_document(
        br#"{"extras": 1, "button": {"radius": 500, "shadow": "huge", "glow": 1}, "stroke": []}"#,
    )
    .unwrap();
    let issues = validate_document(&document);

    let find = |path: &str| issues.iter().find(|issue| issue.path == path);

    assert_eq!(find("extras").unwrap().severity, ValidationSeverity::Warning);
    assert_eq!(find("button.radius").unwrap().severity, ValidationSeverity::Warning);
    assert_eq!(find("button.shadow").unwrap().severity, ValidationSeverity::Error);
    assert_eq!(find("button.glow").unwrap().severity, ValidationSeverity::Warning);
    assert_eq!(find("stroke").unwrap().severity, ValidationSeverity::Error);
    assert!(find("button.bg").is_some());
}

#[test]
fn test_validate_clean_document() {
    let exported = Configuration::default().to_json_pretty().unwrap();
    let document = parse_document(exported.as_bytes()).unwrap();
    assert!(validate_document(&document).is_empty());
}
