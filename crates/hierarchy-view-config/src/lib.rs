//! Configuration and persistence for hierarchy-view.
//!
//! This crate provides tools for:
//! - Parsing `hierarchy.toml` (item paths, separator, default state, header)
//! - Saving and restoring `hierarchy.state.toml` next to it
//!
//! # Usage
//!
//! ```ignore
//! let mut store = hierarchy_view_config::open("scene/hierarchy.toml")?;
//! store.set_node_state(0, false)?;
//! hierarchy_view_config::save("scene/hierarchy.toml", &store)?;
//! ```
//!
//! # State reattachment
//!
//! Stored node bits are matched to the rebuilt tree by flat index, not by
//! name. If the item list is reordered between saves, a bit lands on
//! whichever node now holds its index; nodes past the stored length use
//! `default_state`.

mod config;
mod state_file;

pub use config::{ConfigError, HierarchyConfig};
pub use state_file::{StateFile, StateFileError};

use hierarchy_view::HierarchyStateStore;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// State file path for a config file: `hierarchy.toml` → `hierarchy.state.toml`.
pub fn state_path(config_path: impl AsRef<Path>) -> PathBuf {
    config_path.as_ref().with_extension("state.toml")
}

/// Build a store from `config_path`, restoring the saved state file if one
/// exists.
pub fn open(config_path: impl AsRef<Path>) -> Result<HierarchyStateStore, OpenError> {
    let config_path = config_path.as_ref();
    open_with_state(config_path, state_path(config_path))
}

/// [`open`] with an explicit state file path.
///
/// A state file that exists but is not valid TOML is ignored with a warning;
/// the store then starts from the configured default state.
pub fn open_with_state(
    config_path: impl AsRef<Path>,
    state_path: impl AsRef<Path>,
) -> Result<HierarchyStateStore, OpenError> {
    let config = HierarchyConfig::from_file(config_path)?;
    let state_path = state_path.as_ref();

    let mut store = HierarchyStateStore::new();
    if state_path.exists() {
        match StateFile::from_file(state_path) {
            Ok(file) => {
                debug!("restoring state from {}", state_path.display());
                store.load_script(&file.value);
            }
            Err(StateFileError::Parse(err)) => {
                warn!(
                    "ignoring unreadable state file {}: {}",
                    state_path.display(),
                    err
                );
            }
            Err(other) => return Err(other.into()),
        }
    }

    config.apply(&mut store);
    Ok(store)
}

/// Write `store` to the state file belonging to `config_path`.
pub fn save(
    config_path: impl AsRef<Path>,
    store: &HierarchyStateStore,
) -> Result<(), StateFileError> {
    save_to(state_path(config_path), store)
}

/// Write `store` to `state_path`.
pub fn save_to(
    state_path: impl AsRef<Path>,
    store: &HierarchyStateStore,
) -> Result<(), StateFileError> {
    let state_path = state_path.as_ref();
    StateFile::from_store(store).write_to_file(state_path)?;
    debug!("saved state to {}", state_path.display());
    Ok(())
}

/// Errors that can occur while opening a configured store.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("State file error: {0}")]
    State(#[from] StateFileError),
}
