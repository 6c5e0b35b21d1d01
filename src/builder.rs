//! Path hierarchy builder: turns raw delimited paths into a [`Hierarchy`]
//! and the two check-state sequences aligned with it.

use log::debug;

use crate::bits::{StateBits, CHECKED};
use crate::hierarchy::Hierarchy;

/// Result of a single build: the tree and both state sequences.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Flattened {
    pub hierarchy: Hierarchy,
    /// One flag per tree node, in flat-index order.
    pub node_states: StateBits,
    /// One flag per input path, in input order.
    pub item_states: StateBits,
}

/// Split `path` into its non-empty segments.
///
/// With no separator the whole path is a single opaque segment.
pub fn split_segments(path: &str, separator: Option<char>) -> Vec<&str> {
    match separator {
        Some(sep) => path.split(sep).filter(|s| !s.is_empty()).collect(),
        None => vec![path],
    }
}

/// Builder for a flattened hierarchy.
///
/// ```
/// use hierarchy_view::HierarchyBuilder;
///
/// let flat = HierarchyBuilder::new(Some('/'))
///     .default_state(true)
///     .build(["/root/left", "/root/right"]);
///
/// assert_eq!(flat.hierarchy.node_count(), 3);
/// assert_eq!(flat.node_states.as_str(), "111");
/// assert_eq!(flat.item_states.as_str(), "11");
/// ```
#[derive(Clone, Debug)]
pub struct HierarchyBuilder<'a> {
    separator: Option<char>,
    legacy_states: Option<&'a str>,
    default_state: bool,
}

impl<'a> HierarchyBuilder<'a> {
    /// Nodes start checked unless told otherwise.
    pub fn new(separator: Option<char>) -> Self {
        Self {
            separator,
            legacy_states: None,
            default_state: true,
        }
    }

    /// Previously stored node states, matched by flat index.
    ///
    /// Positions past the end of `states` fall back to the default state.
    /// Matching is positional, so reordered input paths reattach old states
    /// to whichever node now holds that index.
    pub fn legacy_states(mut self, states: Option<&'a str>) -> Self {
        self.legacy_states = states;
        self
    }

    pub fn default_state(mut self, state: bool) -> Self {
        self.default_state = state;
        self
    }

    fn initial_state(&self, flat_index: usize) -> bool {
        self.legacy_states
            .and_then(|s| s.as_bytes().get(flat_index))
            .map_or(self.default_state, |&b| b == CHECKED as u8)
    }

    /// Flatten `paths` in input order.
    ///
    /// Every call starts from scratch; nothing carries over between builds.
    pub fn build<I, S>(&self, paths: I) -> Flattened
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths = paths.into_iter();
        let mut hierarchy = Hierarchy::new(self.separator);
        let mut node_states = StateBits::new();
        let mut item_states = StateBits::with_capacity(paths.size_hint().0);
        hierarchy.reserve_items(paths.size_hint().0);

        for raw in paths {
            let raw = raw.as_ref();
            let mut parent: Option<usize> = None;
            // AND over the chain walked so far.
            let mut chain_checked = true;

            for segment in split_segments(raw, self.separator) {
                let idx = match hierarchy.find_child(parent, segment) {
                    Some(existing) => existing,
                    None => {
                        let created = hierarchy.push_node(parent, segment);
                        node_states.push(self.initial_state(created));
                        created
                    }
                };
                chain_checked &= node_states.get(idx).unwrap_or(false);
                parent = Some(idx);
            }

            // No segment resolved: the item is present but unresolved.
            let item_state = parent.is_some() && chain_checked;
            hierarchy.push_item(raw, parent);
            item_states.push(item_state);
        }

        debug!(
            "flattened {} paths into {} nodes (separator {:?})",
            hierarchy.item_count(),
            hierarchy.node_count(),
            self.separator
        );
        debug_assert_eq!(node_states.len(), hierarchy.node_count());
        debug_assert_eq!(item_states.len(), hierarchy.item_count());

        Flattened {
            hierarchy,
            node_states,
            item_states,
        }
    }
}
