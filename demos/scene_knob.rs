//! Drive a hierarchy store the way a compositing host would.
//!
//! This example shows how to:
//! - Populate a store from a scene path list
//! - Toggle nodes and watch item states follow their ancestors
//! - Persist the knob value and restore it after a scene reload

use hierarchy_view::{hierarchy, HierarchyStateStore, StoreEvent};

// Scene paths as a reader would report them
hierarchy! {
    pub mod Scene {
        root {
            body {
                left_arm { finger1; finger2; finger3; }
                right_arm { finger1; finger2; finger3; }
            }
            legs { left_foot; right_foot; }
        }
        other {
            clothes { left_foot; left_leg; right_foot; right_leg; }
            shoes { left_foot; right_foot; }
        }
    }
}

fn print_tree(store: &HierarchyStateStore) {
    println!("{}", store.header());
    for node in store.nodes() {
        let mark = if node.checked { "[x]" } else { "[ ]" };
        println!("  {}{} {} (#{})", "  ".repeat(node.depth), mark, node.name, node.flat_index);
    }
}

fn print_items(store: &HierarchyStateStore) {
    for (idx, path) in Scene::PATHS.iter().enumerate() {
        let state = store.item_state(idx).unwrap_or(false);
        println!("  item {path} state is {}", u8::from(state));
    }
}

fn main() {
    println!("=== Hierarchy View Example ===\n");

    // 1. Host loads a scene
    let mut store = Scene::store(true);
    store.set_header("scene.abc");
    store.subscribe(|event| {
        if let StoreEvent::ItemStateChanged { item_index, checked } = event {
            println!("  -> item {} now {}", Scene::PATHS[*item_index], checked);
        }
    });
    print_tree(&store);
    println!();

    // 2. User unchecks /root/body/left_arm
    let left_arm = store
        .index_of("/root/body/left_arm")
        .expect("left_arm is in the scene");
    println!("Unchecking /root/body/left_arm...");
    store.set_node_state(left_arm, false).expect("index from lookup");
    println!();

    // 3. User unchecks one shoe
    let shoe = store
        .index_of("/other/shoes/right_foot")
        .expect("right shoe is in the scene");
    println!("Unchecking /other/shoes/right_foot...");
    store.set_node_state(shoe, false).expect("index from lookup");
    println!();

    print_items(&store);
    println!();

    // 4. Save, then reload the scene from the saved text
    let saved = store.serialize();
    println!("Saved knob value: {saved}");
    println!("Fingerprint:      {:#018x}", store.fingerprint());

    let mut reloaded = HierarchyStateStore::with_script(&saved);
    reloaded.reset_keeping_states(Scene::PATHS.iter().copied(), Some(Scene::SEPARATOR), true);
    println!("Reloaded value:   {}", reloaded.serialize());
    println!("Values match: {}", reloaded.serialize() == saved);
}
