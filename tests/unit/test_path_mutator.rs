//! Unit tests for path-addressed mutation
//!
//! Covers path resolution, coercion of widget values and structural sharing
//! of untouched sections.

use dynui::{
    config::{schema, PathError, ValidationError, SECTIONS},
    models::{Configuration, FieldPath, FieldValue},
    services::path_mutator::{apply, apply_detailed, MutationError},
};

fn set(path: &str, value: impl Into<FieldValue>) -> Result<Configuration, MutationError> {
    apply(&Configuration::default(), &FieldPath::from(path), &value.into())
}

#[test]
fn test_every_field_accepts_its_default() {
    let config = Configuration::default();
    for spec in schema::fields() {
        let next = apply(&config, &FieldPath::from(spec.path), &spec.default_value()).unwrap();
        assert_eq!(next, config, "{}", spec.path);
    }
}

#[test]
fn test_only_leaf_changes() {
    let config = Configuration::default();
    let next = apply(&config, &FieldPath::from("general.sectionBg"), &FieldValue::from("#000")).unwrap();

    for spec in schema::fields() {
        if spec.path == "general.sectionBg" {
            assert_eq!(spec.read(&next), FieldValue::from("#000"));
        } else {
            assert_eq!(spec.read(&next), spec.read(&config), "{}", spec.path);
        }
    }
    for section in SECTIONS.iter().filter(|s| **s != "general") {
        assert!(next.shares_section(&config, section));
    }
}

#[test]
fn test_numeric_coercion() {
    assert_eq!(set("button.radius", 9999).unwrap().button.radius, 48);
    assert_eq!(set("button.radius", -5).unwrap().button.radius, 0);
    assert_eq!(set("button.radius", "17").unwrap().button.radius, 17);
    assert_eq!(set("button.radius", " 7.9 ").unwrap().button.radius, 7);
    assert_eq!(set("button.radius", 7.9).unwrap().button.radius, 7);
    assert_eq!(set("general.containerPadding", 100).unwrap().general.container_padding, 64);
}

#[test]
fn test_weight_snaps_to_hundreds() {
    assert_eq!(set("typography.weight", 649).unwrap().typography.weight, 600);
    assert_eq!(set("typography.weight", 650).unwrap().typography.weight, 700);
    assert_eq!(set("typography.weight", 100).unwrap().typography.weight, 400);
    assert_eq!(set("typography.weight", 2000).unwrap().typography.weight, 900);
}

#[test]
fn test_non_finite_and_non_numeric_rejected() {
    assert!(matches!(
        set("stroke.weight", f64::NAN),
        Err(MutationError::Validation(ValidationError::NotFinite { .. }))
    ));
    assert!(matches!(
        set("stroke.weight", f64::INFINITY),
        Err(MutationError::Validation(ValidationError::NotFinite { .. }))
    ));
    assert!(matches!(
        set("stroke.weight", "thick"),
        Err(MutationError::Validation(ValidationError::NotANumber { .. }))
    ));
}

#[test]
fn test_choices_are_exact() {
    assert!(set("button.shadow", "lg").is_ok());
    assert!(set("button.shadow", "LG").is_err());
    assert!(set("layout", "layout3").is_err());
    assert!(matches!(
        set("gallery.align", 1),
        Err(MutationError::Validation(ValidationError::ExpectedText { .. }))
    ));
}

#[test]
fn test_colours_stored_verbatim() {
    let config = set("button.bg", "not really a colour").unwrap();
    assert_eq!(config.button.bg, "not really a colour");
}

#[test]
fn test_path_errors() {
    assert!(matches!(set("", 1), Err(MutationError::Path(PathError::Empty))));
    assert!(matches!(set("stroke", 1), Err(MutationError::Path(PathError::NotALeaf(_)))));
    assert!(matches!(
        set("stroke.weight.px", 1),
        Err(MutationError::Path(PathError::UnknownPath(_)))
    ));
    assert!(matches!(set("borders.width", 1), Err(MutationError::Path(PathError::UnknownPath(_)))));
}

#[test]
fn test_segment_and_dotted_paths_agree() {
    let config = Configuration::default();
    let by_segments = apply(&config, &FieldPath::from(["gallery", "radius"]), &FieldValue::from(3)).unwrap();
    let dotted = apply(&config, &FieldPath::from("gallery.radius"), &FieldValue::from(3)).unwrap();
    assert_eq!(by_segments, dotted);
}

#[test]
fn test_detailed_reports_adjustment() {
    let config = Configuration::default();
    let exact = apply_detailed(&config, &FieldPath::from("gallery.spacing"), &FieldValue::from(20)).unwrap();
    assert!(!exact.adjusted);
    assert_eq!(exact.previous, FieldValue::Integer(12));

    let clamped = apply_detailed(&config, &FieldPath::from("gallery.spacing"), &FieldValue::from(99)).unwrap();
    assert!(clamped.adjusted);
    assert_eq!(clamped.written, FieldValue::Integer(48));
}
