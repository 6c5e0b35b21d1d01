//! End-to-end state synchronization through the public store API.

use hierarchy_view::{HierarchyBuilder, HierarchyStateStore, KnobValue, StoreEvent};
use std::sync::{Arc, Mutex};

#[test]
fn test_build_scenario_two_leaves() {
    let flat = HierarchyBuilder::new(Some('/'))
        .legacy_states(None)
        .default_state(true)
        .build(["/root/left", "/root/right"]);

    let names: Vec<(&str, usize)> = flat
        .hierarchy
        .nodes()
        .iter()
        .map(|n| (n.name.as_str(), n.flat_index))
        .collect();
    assert_eq!(names, vec![("root", 0), ("left", 1), ("right", 2)]);
    assert_eq!(flat.node_states.as_str(), "111");
    assert_eq!(flat.item_states.as_str(), "11");
}

#[test]
fn test_deserialize_scenarios() {
    let v = KnobValue::deserialize("[10,01]");
    assert_eq!(v.node_states.as_str(), "10");
    assert_eq!(v.item_states.as_str(), "01");

    let v = KnobValue::deserialize("[1x0,0]1]");
    assert_eq!(v.node_states.as_str(), "10");
    assert_eq!(v.item_states.as_str(), "0");
}

#[test]
fn test_ancestor_toggle_round_trip() {
    let mut store = HierarchyStateStore::new();
    store.reset(["/a/b", "/a/c"], Some('/'), None, true);
    let a = store.index_of("/a").unwrap();
    let c = store.index_of("/a/c").unwrap();

    store.set_node_state(a, false).unwrap();
    assert_eq!(store.item_states().as_str(), "00");

    store.set_node_state(c, false).unwrap();
    assert_eq!(store.item_states().as_str(), "00");

    store.set_node_state(a, true).unwrap();
    assert_eq!(store.item_states().as_str(), "10");
}

#[test]
fn test_deep_chain_needs_every_ancestor() {
    let mut store = HierarchyStateStore::new();
    store.reset(
        ["/root/body/left_arm/finger1", "/root/body/left_arm/finger2", "/root/legs"],
        Some('/'),
        None,
        true,
    );
    let body = store.index_of("/root/body").unwrap();
    let root = store.index_of("/root").unwrap();

    store.set_node_state(body, false).unwrap();
    assert_eq!(store.item_states().as_str(), "001");

    store.set_node_state(root, false).unwrap();
    assert_eq!(store.item_states().as_str(), "000");

    // root back on: body is still off
    store.set_node_state(root, true).unwrap();
    assert_eq!(store.item_states().as_str(), "001");

    store.set_node_state(body, true).unwrap();
    assert_eq!(store.item_states().as_str(), "111");
}

#[test]
fn test_legacy_states_restore_item_derivation() {
    let mut store = HierarchyStateStore::new();
    // root=0 on, left=1 off, right=2 falls back to default
    store.reset(["/root/left", "/root/right"], Some('/'), Some("10"), true);
    assert_eq!(store.serialize(), "[101,01]");

    // shorter-than-needed legacy string with a false default
    store.reset(["/root/left", "/root/right"], Some('/'), Some("1"), false);
    assert_eq!(store.serialize(), "[100,00]");
}

#[test]
fn test_unresolved_items_stay_false() {
    let mut store = HierarchyStateStore::new();
    store.reset(["///", "/a"], Some('/'), None, true);
    assert_eq!(store.item_count(), 2);
    assert_eq!(store.item_state(0), Ok(false));

    let a = store.index_of("/a").unwrap();
    store.set_node_state(a, false).unwrap();
    store.set_node_state(a, true).unwrap();
    assert_eq!(store.item_states().as_str(), "01");
}

#[test]
fn test_presentation_observer_sees_reset_then_toggles() {
    let mut store = HierarchyStateStore::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    store.subscribe(move |event| {
        if event.is_structural() {
            sink.lock().unwrap().push("structure".to_string());
        } else if let StoreEvent::ItemStateChanged { item_index, checked } = event {
            sink.lock().unwrap().push(format!("item{item_index}={checked}"));
        }
    });

    store.reset(["/a/b", "/a/c"], Some('/'), None, true);
    store.set_node_state(1, false).unwrap();
    store.load_script("[111,11]");
    store.clear();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["structure", "item0=false", "structure", "structure"]
    );
}

#[test]
fn test_persisted_text_survives_host_reload() {
    let paths = ["/root/left", "/root/right", "/other"];

    let mut original = HierarchyStateStore::new();
    original.reset(paths, Some('/'), None, true);
    original.set_node_state(0, false).unwrap();
    let saved = original.serialize();
    assert_eq!(saved, "[0111,001]");

    // host: construct knob from saved text, then rebuild with get_text()
    let mut reloaded = HierarchyStateStore::with_script(&saved);
    let legacy = reloaded.text().to_string();
    reloaded.reset(paths, Some('/'), Some(&legacy), true);

    assert_eq!(reloaded.serialize(), saved);
    assert_eq!(reloaded.fingerprint(), original.fingerprint());
}
