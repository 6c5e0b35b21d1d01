//! Flattened hierarchy: the deduplicated tree built from raw item paths.

use std::collections::HashMap;

/// Separator used to join full paths when the hierarchy is not expanded.
pub const DEFAULT_JOIN: char = '/';

/// One unique segment of the flattened hierarchy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    /// Separator-joined path from the root, e.g. `/root/body`. Never changes
    /// once assigned.
    pub full_path: String,
    /// Creation order; also the node's position in the node-state sequence.
    pub flat_index: usize,
    /// 0 for roots.
    pub depth: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// One entry of the host-supplied path list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OriginalItem {
    pub raw_path: String,
    /// Node the path resolves to. `None` for paths without any segment.
    pub terminal: Option<usize>,
    pub item_index: usize,
}

/// Arena-backed tree plus the item list it was built from.
///
/// Nodes are stored in creation order, so a node's arena slot is its
/// `flat_index`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hierarchy {
    separator: Option<char>,
    nodes: Vec<TreeNode>,
    roots: Vec<usize>,
    items: Vec<OriginalItem>,
    path_to_idx: HashMap<String, usize>,
}

/// Invariant violations reported by [`Hierarchy::validate`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    #[error("node at slot {slot} carries flat index {flat_index}")]
    FlatIndexMismatch { slot: usize, flat_index: usize },
    #[error("full path '{path}' maps to {found:?}, expected {expected}")]
    PathMapMismatch {
        path: String,
        expected: usize,
        found: Option<usize>,
    },
    #[error("full path '{path}' of node {flat_index} does not extend its parent's path")]
    PathNotExtendingParent { path: String, flat_index: usize },
    #[error("item {item_index} resolves to missing node {terminal}")]
    DanglingItem { item_index: usize, terminal: usize },
    #[error("path map holds {map} entries for {nodes} nodes")]
    PathMapSize { map: usize, nodes: usize },
}

impl Hierarchy {
    pub fn new(separator: Option<char>) -> Self {
        Self {
            separator,
            ..Self::default()
        }
    }

    /// Separator the hierarchy was split on (`None` = opaque paths).
    #[inline]
    pub fn separator(&self) -> Option<char> {
        self.separator
    }

    /// Character placed between segments of a full path.
    #[inline]
    pub fn join_char(&self) -> char {
        self.separator.unwrap_or(DEFAULT_JOIN)
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.items.is_empty()
    }

    #[inline]
    pub fn node(&self, flat_index: usize) -> Option<&TreeNode> {
        self.nodes.get(flat_index)
    }

    /// All nodes in flat-index order.
    #[inline]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Top-level nodes in creation order.
    #[inline]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn children_of(&self, flat_index: usize) -> &[usize] {
        self.nodes
            .get(flat_index)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    #[inline]
    pub fn item(&self, item_index: usize) -> Option<&OriginalItem> {
        self.items.get(item_index)
    }

    #[inline]
    pub fn items(&self) -> &[OriginalItem] {
        &self.items
    }

    /// Full path → flat index. `None` for unknown (or empty) paths.
    #[inline]
    pub fn index_of(&self, full_path: &str) -> Option<usize> {
        if full_path.is_empty() {
            return None;
        }
        self.path_to_idx.get(full_path).copied()
    }

    #[inline]
    pub fn contains(&self, full_path: &str) -> bool {
        self.index_of(full_path).is_some()
    }

    /// Number of levels (0 = empty, 1 = only roots, ...).
    pub fn tree_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth + 1).max().unwrap_or(0)
    }

    /// `flat_index` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, flat_index: usize) -> Ancestors<'_> {
        Ancestors {
            hierarchy: self,
            next: self.nodes.get(flat_index).map(|n| n.flat_index),
        }
    }

    /// Is `ancestor` equal to `node` or somewhere on its parent chain?
    pub fn is_ancestor_or_self(&self, ancestor: usize, node: usize) -> bool {
        self.ancestors(node).any(|i| i == ancestor)
    }

    /// Indices of items whose terminal node is `flat_index` or one of its
    /// descendants.
    pub fn items_under(&self, flat_index: usize) -> Vec<usize> {
        self.items
            .iter()
            .filter(|item| {
                item.terminal
                    .is_some_and(|t| self.is_ancestor_or_self(flat_index, t))
            })
            .map(|item| item.item_index)
            .collect()
    }

    /// Depth-first display order: each node before its children, siblings in
    /// creation order.
    pub fn walk(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            out.push(idx);
            stack.extend(self.nodes[idx].children.iter().rev().copied());
        }
        out
    }

    /// Check the structural invariants: flat indices are a bijection onto
    /// `0..node_count`, the path map agrees with every node, child paths
    /// extend their parent's path, and items only reference live nodes.
    pub fn validate(&self) -> Result<(), HierarchyError> {
        if self.path_to_idx.len() != self.nodes.len() {
            return Err(HierarchyError::PathMapSize {
                map: self.path_to_idx.len(),
                nodes: self.nodes.len(),
            });
        }
        let join = self.join_char();
        for (slot, node) in self.nodes.iter().enumerate() {
            if node.flat_index != slot {
                return Err(HierarchyError::FlatIndexMismatch {
                    slot,
                    flat_index: node.flat_index,
                });
            }
            let found = self.path_to_idx.get(&node.full_path).copied();
            if found != Some(slot) {
                return Err(HierarchyError::PathMapMismatch {
                    path: node.full_path.clone(),
                    expected: slot,
                    found,
                });
            }
            let prefix = match node.parent.and_then(|p| self.nodes.get(p)) {
                Some(parent) => parent.full_path.as_str(),
                None => "",
            };
            let extends = node
                .full_path
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix(join))
                .is_some_and(|rest| rest == node.name);
            if !extends {
                return Err(HierarchyError::PathNotExtendingParent {
                    path: node.full_path.clone(),
                    flat_index: slot,
                });
            }
        }
        for item in &self.items {
            if let Some(terminal) = item.terminal
                && terminal >= self.nodes.len()
            {
                return Err(HierarchyError::DanglingItem {
                    item_index: item.item_index,
                    terminal,
                });
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Construction (used by the builder)
    // -------------------------------------------------------------------------

    /// Child of `parent` (or root when `None`) called `name`, if it exists.
    pub(crate) fn find_child(&self, parent: Option<usize>, name: &str) -> Option<usize> {
        self.path_to_idx.get(&self.child_path(parent, name)).copied()
    }

    pub(crate) fn child_path(&self, parent: Option<usize>, name: &str) -> String {
        let prefix = parent
            .and_then(|p| self.nodes.get(p))
            .map(|n| n.full_path.as_str())
            .unwrap_or("");
        let mut path = String::with_capacity(prefix.len() + 1 + name.len());
        path.push_str(prefix);
        path.push(self.join_char());
        path.push_str(name);
        path
    }

    /// Append a new node under `parent` and return its flat index.
    pub(crate) fn push_node(&mut self, parent: Option<usize>, name: &str) -> usize {
        let flat_index = self.nodes.len();
        let full_path = self.child_path(parent, name);
        let depth = parent.map(|p| self.nodes[p].depth + 1).unwrap_or(0);

        self.path_to_idx.insert(full_path.clone(), flat_index);
        self.nodes.push(TreeNode {
            name: name.to_string(),
            full_path,
            flat_index,
            depth,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.nodes[p].children.push(flat_index),
            None => self.roots.push(flat_index),
        }
        flat_index
    }

    pub(crate) fn push_item(&mut self, raw_path: &str, terminal: Option<usize>) -> usize {
        let item_index = self.items.len();
        self.items.push(OriginalItem {
            raw_path: raw_path.to_string(),
            terminal,
            item_index,
        });
        item_index
    }

    pub(crate) fn reserve_items(&mut self, additional: usize) {
        self.items.reserve(additional);
    }
}

/// Iterator over a node and its ancestors, nearest first.
pub struct Ancestors<'a> {
    hierarchy: &'a Hierarchy,
    next: Option<usize>,
}

impl Iterator for Ancestors<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        self.next = self.hierarchy.nodes.get(current).and_then(|n| n.parent);
        Some(current)
    }
}
