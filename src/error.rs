//! Errors returned by store accessors.

/// Which state sequence an index addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sequence {
    /// Per tree node, indexed by flat index.
    Node,
    /// Per original item, indexed by input position.
    Item,
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Item => f.write_str("item"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Index outside the sequence's current bounds. Nothing was changed.
    #[error("{sequence} index {index} out of range (len {len})")]
    OutOfRange {
        sequence: Sequence,
        index: usize,
        len: usize,
    },
}

pub type Result<T, E = StateError> = std::result::Result<T, E>;
