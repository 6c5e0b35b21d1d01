use super::*;

use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "root", "left", "right"]).prop_map(String::from)
}

/// Paths over a small alphabet so prefixes and duplicates are common.
fn raw_path() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 0..5).prop_map(|segs| {
        let mut path = String::new();
        for s in segs {
            path.push('/');
            path.push_str(&s);
        }
        if path.is_empty() { "/".to_string() } else { path }
    })
}

fn path_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(raw_path(), 0..24)
}

fn check_item_states(store: &HierarchyStateStore) {
    let h = store.hierarchy();
    for item in h.items() {
        let expected = item.terminal.is_some_and(|t| {
            h.ancestors(t)
                .all(|i| store.node_state(i).unwrap_or(false))
        });
        assert_eq!(
            store.item_state(item.item_index),
            Ok(expected),
            "item {} ('{}') out of sync",
            item.item_index,
            item.raw_path
        );
    }
}

proptest! {
    #[test]
    fn build_is_idempotent(paths in path_list(), legacy in "[01]{0,12}", default in any::<bool>()) {
        let builder = HierarchyBuilder::new(Some('/'))
            .legacy_states(Some(legacy.as_str()))
            .default_state(default);
        let first = builder.build(&paths);
        let second = builder.build(&paths);

        for node in first.hierarchy.nodes() {
            prop_assert_eq!(second.hierarchy.index_of(&node.full_path), Some(node.flat_index));
        }
        prop_assert_eq!(first, second);
    }

    #[test]
    fn reset_lengths_hold(paths in path_list(), legacy in "[01]{0,12}") {
        let mut store = HierarchyStateStore::new();
        store.reset(&paths, Some('/'), Some(legacy.as_str()), true);

        prop_assert_eq!(store.node_states().len(), store.node_count());
        prop_assert_eq!(store.item_states().len(), store.item_count());
        prop_assert_eq!(store.item_count(), paths.len());
        prop_assert_eq!(store.hierarchy().validate(), Ok(()));
        check_item_states(&store);
    }

    #[test]
    fn toggles_keep_items_derived(
        paths in path_list(),
        toggles in prop::collection::vec((any::<prop::sample::Index>(), any::<bool>()), 0..16),
    ) {
        let mut store = HierarchyStateStore::new();
        store.reset(&paths, Some('/'), None, true);
        prop_assume!(store.node_count() > 0);

        for (idx, value) in toggles {
            let flat_index = idx.index(store.node_count());
            store.set_node_state(flat_index, value).unwrap();
            check_item_states(&store);
        }
    }

    #[test]
    fn loaded_script_matches_tree(paths in path_list(), text in "[01,\\]x]{0,40}") {
        let mut store = HierarchyStateStore::new();
        store.reset(&paths, Some('/'), None, true);
        store.load_script(&text);

        prop_assert_eq!(store.node_states().len(), store.node_count());
        prop_assert_eq!(store.item_states().len(), store.item_count());
        check_item_states(&store);
    }

    #[test]
    fn script_round_trip(nodes in "[01]{0,32}", items in "[01]{0,32}") {
        let value = KnobValue::new(StateBits::from_lossy(&nodes), StateBits::from_lossy(&items));
        prop_assert_eq!(KnobValue::deserialize(&value.serialize()), value);
    }

    #[test]
    fn deserialize_never_panics(text in ".{0,64}") {
        let value = KnobValue::deserialize(&text);
        prop_assert!(value.node_states.len() + value.item_states.len() <= text.len());
    }
}
