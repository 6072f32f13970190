//! Contract tests for the configuration store
//!
//! The store is the single writer: snapshots handed out are immutable, every
//! accepted change notifies observers once, rejected changes notify nobody.

use dynui::{
    models::{Configuration, FieldPath, FieldValue},
    services::{ConfigEvent, ConfigStore},
};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn observed(store: &mut ConfigStore) -> Arc<Mutex<Vec<(ConfigEvent, Arc<Configuration>)>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe(move |event, snapshot| {
        sink.lock().unwrap().push((event.clone(), Arc::clone(snapshot)));
    });
    seen
}

#[test]
fn test_observers_receive_the_new_snapshot() {
    let mut store = ConfigStore::default();
    let seen = observed(&mut store);

    let returned = store
        .apply(&FieldPath::from("gallery.radius"), &FieldValue::from(4))
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(Arc::ptr_eq(&seen[0].1, &returned));
    assert!(Arc::ptr_eq(&store.get(), &returned));
}

#[test]
fn test_every_observer_is_called_in_order() {
    let mut store = ConfigStore::default();
    let order = Arc::new(Mutex::new(Vec::new()));
    for id in 0..3 {
        let order = Arc::clone(&order);
        store.subscribe(move |_, _| order.lock().unwrap().push(id));
    }

    store.reset();
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
}

#[test]
fn test_set_replaces_whole_configuration() {
    let mut store = ConfigStore::default();
    let seen = observed(&mut store);

    let mut replacement = Configuration::default();
    replacement.layout = dynui::models::Layout::Layout2;
    store.set(replacement.clone());

    assert_eq!(*store.get(), replacement);
    assert_eq!(seen.lock().unwrap()[0].0, ConfigEvent::Replaced);
}

#[test]
fn test_clamped_value_equal_to_current_is_a_noop() {
    let mut store = ConfigStore::default();
    store
        .apply(&FieldPath::from("button.radius"), &FieldValue::from(48))
        .unwrap();
    let seen = observed(&mut store);
    let version = store.version();

    store
        .apply(&FieldPath::from("button.radius"), &FieldValue::from(1000))
        .unwrap();

    assert_eq!(store.version(), version);
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_import_merge_keeps_untouched_sections_shared() {
    let mut store = ConfigStore::default();
    let before = store.get();

    let partial = json!({"typography": {"size": 30}});
    let after = store.import_merge(partial.as_object().unwrap());

    assert_eq!(after.typography.size, 30);
    for section in ["button", "gallery", "general", "stroke"] {
        assert!(after.shares_section(&before, section), "{}", section);
    }
}

#[test]
fn test_reset_notifies_even_when_already_default() {
    let mut store = ConfigStore::default();
    let seen = observed(&mut store);

    store.reset();
    store.reset();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|(event, _)| *event == ConfigEvent::Reset));
    assert_eq!(*seen[1].1, Configuration::default());
}

#[test]
fn test_set_clamps_fields_outside_their_constraint() {
    let mut store = ConfigStore::default();
    let seen = observed(&mut store);

    let mut config = Configuration::default();
    Arc::make_mut(&mut config.button).radius = 9999;
    Arc::make_mut(&mut config.general).container_padding = 500;
    Arc::make_mut(&mut config.typography).family = "Comic Sans".to_string();
    let snapshot = store.set(config);

    let defaults = Configuration::default();
    assert_eq!(snapshot.button.radius, 48);
    assert_eq!(snapshot.typography.family, defaults.typography.family);
    assert_eq!(snapshot.general.container_padding, 64);
    assert_eq!(seen.lock().unwrap().len(), 1);
    assert_eq!(seen.lock().unwrap()[0].1.button.radius, 48);
}
