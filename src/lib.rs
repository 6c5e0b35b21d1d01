//! # Hierarchy View (hierarchy-view)
//!
//! State engine for a collapsible checkbox tree built from delimited paths
//! such as `/root/body/left_arm/finger1`.
//!
//! ## Design
//!
//! The host hands over a flat list of paths. The builder splits and
//! deduplicates them into a tree, numbering each unique node in discovery
//! order:
//!
//! ```text
//! /root/left    root(0) ─┬─ left(1)
//! /root/right            └─ right(2)
//! ```
//!
//! Two check-state sequences are kept side by side:
//!
//! - node states, one per tree node, set directly by the user
//! - item states, one per input path, true iff the path's node and all its
//!   ancestors are checked
//!
//! Both persist as a single text value `[<node bits>,<item bits>]`.
//!
//! ```
//! use hierarchy_view::HierarchyStateStore;
//!
//! let mut store = HierarchyStateStore::new();
//! store.reset(["/a/b", "/a/c"], Some('/'), None, true);
//!
//! let a = store.index_of("/a").unwrap();
//! store.set_node_state(a, false).unwrap();
//!
//! assert_eq!(store.serialize(), "[011,00]");
//! ```

pub mod bevy;
pub mod bits;
pub mod builder;
pub mod error;
pub mod hash;
pub mod hierarchy;
pub mod script;
pub mod store;

#[cfg(test)]
mod proptests;

pub use bits::StateBits;
pub use builder::{split_segments, Flattened, HierarchyBuilder};
pub use error::{Sequence, StateError};
pub use hash::{fnv1a_64, state_fingerprint};
pub use hierarchy::{Hierarchy, HierarchyError, OriginalItem, TreeNode};
pub use hierarchy_view_macro::hierarchy;
pub use script::KnobValue;
pub use store::{HierarchyStateStore, NodeView, StoreEvent, SubscriptionId};
