//! TOML configuration parser for hierarchy.toml.

use hierarchy_view::HierarchyStateStore;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Parsed hierarchy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyConfig {
    /// Label shown above the tree
    pub header: Option<String>,
    /// `None` keeps every path as one opaque node
    pub separator: Option<char>,
    /// State for nodes without a stored bit
    pub default_state: bool,
    paths: Vec<String>,
}

/// Raw TOML structure.
#[derive(Debug, Deserialize)]
struct RawHierarchyConfig {
    header: Option<String>,
    /// Single character, or "" for no hierarchy expansion. Defaults to "/".
    separator: Option<String>,
    default_state: Option<bool>,
    items: RawItems,
}

#[derive(Debug, Deserialize)]
struct RawItems {
    /// Raw item paths, in host order
    paths: Vec<String>,
}

impl HierarchyConfig {
    /// Parse from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parse from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawHierarchyConfig = toml::from_str(content)?;

        let separator = Self::parse_separator(raw.separator.as_deref())?;
        let config = Self {
            header: raw.header,
            separator,
            default_state: raw.default_state.unwrap_or(true),
            paths: raw.items.paths,
        };
        debug!(
            "parsed hierarchy config: {} paths, separator {:?}",
            config.paths.len(),
            config.separator
        );
        Ok(config)
    }

    fn parse_separator(raw: Option<&str>) -> Result<Option<char>, ConfigError> {
        let Some(raw) = raw else {
            return Ok(Some('/'));
        };
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(None),
            (Some(c), None) => Ok(Some(c)),
            (Some(_), Some(_)) => Err(ConfigError::Validation(format!(
                "Invalid separator '{}': expected a single character or \"\"",
                raw
            ))),
        }
    }

    /// Raw item paths in input order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Rebuild `store` from this configuration.
    ///
    /// Node states already held by the store (e.g. from a state file) are
    /// reused by flat index.
    pub fn apply(&self, store: &mut HierarchyStateStore) {
        if let Some(header) = &self.header {
            store.set_header(header.clone());
        }
        if self.paths.is_empty() {
            store.clear();
        } else {
            store.reset_keeping_states(&self.paths, self.separator, self.default_state);
        }
    }
}

/// Errors during config parsing.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}
