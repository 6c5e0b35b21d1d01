//! State file (`hierarchy.state.toml`): the persisted knob value.
//!
//! ```toml
//! value = "[11010,101]"
//! saved_at = "2026-10-14T09:30:00+00:00"
//! node_count = 5
//! item_count = 3
//! ```
//!
//! Only `value` is read back; the other fields are informational.

use hierarchy_view::{HierarchyStateStore, KnobValue};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile {
    /// Serialized `[<node bits>,<item bits>]` text
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
    #[serde(default)]
    pub node_count: usize,
    #[serde(default)]
    pub item_count: usize,
}

impl StateFile {
    /// Snapshot `store`, stamped with the current time.
    pub fn from_store(store: &HierarchyStateStore) -> Self {
        Self {
            value: store.serialize(),
            saved_at: Some(chrono::Utc::now().to_rfc3339()),
            node_count: store.node_count(),
            item_count: store.item_count(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StateFileError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| StateFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, StateFileError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, StateFileError> {
        Ok(toml::to_string(self)?)
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), StateFileError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_toml()?).map_err(|source| StateFileError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Decoded knob value (tolerant, never fails).
    pub fn knob_value(&self) -> KnobValue {
        KnobValue::deserialize(&self.value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateFileError {
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
