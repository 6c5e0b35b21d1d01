//! Hierarchy state store: owns the tree, both state sequences and the
//! observers watching them.

use log::{debug, trace};

use crate::bits::StateBits;
use crate::builder::{Flattened, HierarchyBuilder};
use crate::error::{Result, Sequence, StateError};
use crate::hash::state_fingerprint;
use crate::hierarchy::Hierarchy;
use crate::script::KnobValue;

/// Notification delivered to store subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    NodeStateChanged { flat_index: usize, checked: bool },
    ItemStateChanged { item_index: usize, checked: bool },
    /// The tree was rebuilt; every index handed out before is stale.
    StructureReset { node_count: usize, item_count: usize },
    Cleared,
    /// Persisted text was adopted.
    ScriptLoaded,
}

impl StoreEvent {
    /// Structural events invalidate any cached node or item indices.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::StructureReset { .. } | Self::Cleared | Self::ScriptLoaded
        )
    }
}

/// Handle returned by [`HierarchyStateStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&StoreEvent) + Send + Sync>;

#[derive(Default)]
struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback)>,
}

impl Observers {
    fn add(&mut self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    fn emit(&mut self, event: &StoreEvent) {
        for (_, callback) in &mut self.entries {
            callback(event);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}

/// One tree node as the presentation layer sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeView<'a> {
    pub name: &'a str,
    pub flat_index: usize,
    pub depth: usize,
    pub checked: bool,
}

/// State engine behind a hierarchy checkbox control.
///
/// Provides:
/// - Atomic rebuild from a raw path list
/// - Bounds-checked node/item state accessors
/// - Ancestor propagation from node toggles to item states
/// - `[nodes,items]` text persistence and change fingerprints
/// - Subscribe/unsubscribe for change notifications
#[derive(Debug)]
pub struct HierarchyStateStore {
    hierarchy: Hierarchy,
    value: KnobValue,
    /// Node field of text loaded before any tree exists; consumed by the
    /// next `reset`.
    pending: Option<StateBits>,
    default_state: bool,
    header: String,
    observers: Observers,
}

impl Default for HierarchyStateStore {
    fn default() -> Self {
        Self {
            hierarchy: Hierarchy::default(),
            value: KnobValue::default(),
            pending: None,
            default_state: true,
            header: String::new(),
            observers: Observers::default(),
        }
    }
}

impl HierarchyStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with persisted text; the tree stays empty until `reset`.
    pub fn with_script(text: &str) -> Self {
        let mut store = Self::default();
        store.pending = Some(KnobValue::deserialize(text).node_states);
        store
    }

    #[inline]
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    #[inline]
    pub fn value(&self) -> &KnobValue {
        &self.value
    }

    #[inline]
    pub fn node_states(&self) -> &StateBits {
        &self.value.node_states
    }

    #[inline]
    pub fn item_states(&self) -> &StateBits {
        &self.value.item_states
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.hierarchy.node_count()
    }

    #[inline]
    pub fn item_count(&self) -> usize {
        self.hierarchy.item_count()
    }

    /// True while no tree is loaded.
    #[inline]
    pub fn is_default(&self) -> bool {
        self.hierarchy.node_count() == 0
    }

    #[inline]
    pub fn index_of(&self, full_path: &str) -> Option<usize> {
        self.hierarchy.index_of(full_path)
    }

    #[inline]
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn set_header(&mut self, text: impl Into<String>) {
        self.header = text.into();
    }

    // -------------------------------------------------------------------------
    // Observers
    // -------------------------------------------------------------------------

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + Send + Sync + 'static,
    {
        self.observers.add(Box::new(callback))
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(id)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn node_state(&self, flat_index: usize) -> Result<bool> {
        self.value
            .node_states
            .get(flat_index)
            .ok_or(StateError::OutOfRange {
                sequence: Sequence::Node,
                index: flat_index,
                len: self.value.node_states.len(),
            })
    }

    pub fn item_state(&self, item_index: usize) -> Result<bool> {
        self.value
            .item_states
            .get(item_index)
            .ok_or(StateError::OutOfRange {
                sequence: Sequence::Item,
                index: item_index,
                len: self.value.item_states.len(),
            })
    }

    /// Set a node's check flag and recompute the state of every item whose
    /// terminal node is `flat_index` or lies below it.
    pub fn set_node_state(&mut self, flat_index: usize, checked: bool) -> Result<()> {
        let previous = self.node_state(flat_index)?;
        trace!("set node {flat_index} to {checked}");

        self.value.node_states.set(flat_index, checked);
        if previous != checked {
            self.observers.emit(&StoreEvent::NodeStateChanged {
                flat_index,
                checked,
            });
        }

        for item_index in self.hierarchy.items_under(flat_index) {
            let derived = self.derived_item_state(item_index);
            let Some(current) = self.value.item_states.get(item_index) else {
                continue;
            };
            if current != derived {
                self.value.item_states.set(item_index, derived);
                self.observers.emit(&StoreEvent::ItemStateChanged {
                    item_index,
                    checked: derived,
                });
            }
        }
        Ok(())
    }

    /// Set an item flag directly. No propagation.
    pub fn set_item_state(&mut self, item_index: usize, checked: bool) -> Result<()> {
        let previous = self.item_state(item_index)?;
        self.value.item_states.set(item_index, checked);
        if previous != checked {
            self.observers.emit(&StoreEvent::ItemStateChanged {
                item_index,
                checked,
            });
        }
        Ok(())
    }

    /// AND of the node flags from the item's terminal node up to its root.
    /// Unresolved items are always unchecked.
    fn derived_item_state(&self, item_index: usize) -> bool {
        let Some(terminal) = self.hierarchy.item(item_index).and_then(|i| i.terminal) else {
            return false;
        };
        self.hierarchy
            .ancestors(terminal)
            .all(|idx| self.value.node_states.get(idx).unwrap_or(false))
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Drop the tree, both state sequences, the path map and any pending
    /// script. The header is kept.
    pub fn clear(&mut self) {
        debug!(
            "clearing hierarchy ({} nodes, {} items)",
            self.node_count(),
            self.item_count()
        );
        self.hierarchy = Hierarchy::default();
        self.value.clear();
        self.pending = None;
        self.observers.emit(&StoreEvent::Cleared);
    }

    /// Rebuild from `paths`, replacing the previous tree and both sequences
    /// in one step.
    ///
    /// Without `legacy_states`, node bits from a pending script are used.
    pub fn reset<I, S>(
        &mut self,
        paths: I,
        separator: Option<char>,
        legacy_states: Option<&str>,
        default_state: bool,
    ) where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pending = self.pending.take();
        let legacy_states = legacy_states.or(pending.as_ref().map(StateBits::as_str));
        let flat = HierarchyBuilder::new(separator)
            .legacy_states(legacy_states)
            .default_state(default_state)
            .build(paths);
        self.default_state = default_state;
        self.adopt(flat);
    }

    /// `reset`, reusing [`text`](Self::text) as the legacy string.
    pub fn reset_keeping_states<I, S>(
        &mut self,
        paths: I,
        separator: Option<char>,
        default_state: bool,
    ) where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let legacy = self.text().to_owned();
        self.reset(paths, separator, Some(legacy.as_str()), default_state);
    }

    /// Install a finished build.
    pub fn adopt(&mut self, flat: Flattened) {
        let Flattened {
            hierarchy,
            node_states,
            item_states,
        } = flat;
        debug_assert_eq!(hierarchy.validate(), Ok(()));

        self.hierarchy = hierarchy;
        self.value = KnobValue::new(node_states, item_states);
        debug!(
            "hierarchy reset: {} nodes, {} items",
            self.node_count(),
            self.item_count()
        );
        self.observers.emit(&StoreEvent::StructureReset {
            node_count: self.node_count(),
            item_count: self.item_count(),
        });
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    /// `"[<node bits>,<item bits>]"`.
    pub fn serialize(&self) -> String {
        self.value.serialize()
    }

    /// Adopt persisted text.
    ///
    /// On a populated store the node field is laid over the current tree by
    /// flat index (missing bits take the last reset's default state) and
    /// every item is re-derived from its ancestor chain; the stored item
    /// field is not trusted. On an empty store the node field is held until
    /// the next `reset`.
    pub fn load_script(&mut self, text: &str) {
        let decoded = KnobValue::deserialize(text);
        if self.hierarchy.is_empty() {
            debug!(
                "holding script: {} node states until the next reset",
                decoded.node_states.len()
            );
            self.pending = Some(decoded.node_states);
        } else {
            self.value.node_states = (0..self.node_count())
                .map(|idx| decoded.node_states.get(idx).unwrap_or(self.default_state))
                .collect();
            self.value.item_states = (0..self.item_count())
                .map(|idx| self.derived_item_state(idx))
                .collect();
            debug!(
                "loaded script over {} nodes ({} stored bits)",
                self.node_count(),
                decoded.node_states.len()
            );
        }
        self.observers.emit(&StoreEvent::ScriptLoaded);
    }

    /// Node-state field as plain text: the pending script if one is held,
    /// otherwise the live node states. Empty if unset.
    #[inline]
    pub fn text(&self) -> &str {
        self.pending
            .as_ref()
            .unwrap_or(&self.value.node_states)
            .as_str()
    }

    /// Both raw fields, for the host's dependency hash. They change exactly
    /// when a state sequence changes.
    #[inline]
    pub fn hash_contribution(&self) -> (&str, &str) {
        (
            self.value.node_states.as_str(),
            self.value.item_states.as_str(),
        )
    }

    pub fn fingerprint(&self) -> u64 {
        let (nodes, items) = self.hash_contribution();
        state_fingerprint(nodes, items)
    }

    // -------------------------------------------------------------------------
    // Presentation
    // -------------------------------------------------------------------------

    /// Every node in display order with its current check flag.
    pub fn nodes(&self) -> impl Iterator<Item = NodeView<'_>> + '_ {
        self.hierarchy.walk().into_iter().filter_map(move |idx| {
            let node = self.hierarchy.node(idx)?;
            Some(NodeView {
                name: &node.name,
                flat_index: node.flat_index,
                depth: node.depth,
                checked: self.value.node_states.get(idx).unwrap_or(false),
            })
        })
    }
}
