//! Bevy integration for the hierarchy state store.
//!
//! Provides `HierarchyViewPlugin`: a builder-pattern plugin that inserts a
//! populated [`HierarchyStateStore`] as a Resource.
//!
//! # Example
//!
//! ```ignore
//! use bevy::prelude::*;
//! use hierarchy_view::bevy::*;
//! use hierarchy_view::HierarchyStateStore;
//!
//! hierarchy_view::hierarchy! {
//!     pub mod Scene {
//!         root { body { left_arm; right_arm; } }
//!     }
//! }
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(HierarchyViewPlugin::from_paths(Scene::PATHS).header("scene.abc"))
//!         .add_systems(Update, report)
//!         .run();
//! }
//!
//! fn report(store: Res<HierarchyStateStore>) {
//!     if store.is_changed() {
//!         println!("{}", store.serialize());
//!     }
//! }
//! ```

use bevy::prelude::*;

use crate::store::HierarchyStateStore;

// =============================================================================
// Plugin
// =============================================================================

/// Bevy plugin for the hierarchy view.
///
/// ```ignore
/// App::new()
///     .add_plugins(
///         HierarchyViewPlugin::from_paths(&["/a/b", "/a/c"])
///             .separator(Some('/'))
///             .default_state(false)
///     )
/// ```
pub struct HierarchyViewPlugin {
    paths: &'static [&'static str],
    settings: HierarchyViewSettings,
    legacy_states: Option<String>,
    header: String,
}

impl Default for HierarchyViewPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyViewPlugin {
    /// Plugin with an empty store.
    pub fn new() -> Self {
        Self {
            paths: &[],
            settings: HierarchyViewSettings::default(),
            legacy_states: None,
            header: String::new(),
        }
    }

    /// Plugin that builds the store from a static path list (e.g. from the
    /// `hierarchy!` macro).
    pub fn from_paths(paths: &'static [&'static str]) -> Self {
        Self {
            paths,
            ..Self::new()
        }
    }

    /// Default: `Some('/')`
    pub fn separator(mut self, separator: Option<char>) -> Self {
        self.settings.separator = separator;
        self
    }

    /// Default: `true`
    pub fn default_state(mut self, state: bool) -> Self {
        self.settings.default_state = state;
        self
    }

    /// Node states restored by flat index before falling back to the default.
    pub fn legacy_states(mut self, states: impl Into<String>) -> Self {
        self.legacy_states = Some(states.into());
        self
    }

    pub fn header(mut self, text: impl Into<String>) -> Self {
        self.header = text.into();
        self
    }
}

impl Plugin for HierarchyViewPlugin {
    fn build(&self, app: &mut App) {
        let mut store = HierarchyStateStore::new();
        store.set_header(self.header.clone());
        if !self.paths.is_empty() {
            store.reset(
                self.paths.iter().copied(),
                self.settings.separator,
                self.legacy_states.as_deref(),
                self.settings.default_state,
            );
        }

        app.insert_resource(store);

        // Kept so later resets use the same options
        app.insert_resource(self.settings.clone());
    }
}

/// Build options shared by every reset of the store.
#[derive(Resource, Clone, Debug, PartialEq, Eq)]
pub struct HierarchyViewSettings {
    pub separator: Option<char>,
    pub default_state: bool,
}

impl Default for HierarchyViewSettings {
    fn default() -> Self {
        Self {
            separator: Some('/'),
            default_state: true,
        }
    }
}

impl HierarchyViewSettings {
    /// Rebuild `store` from `paths`, keeping its node states by position.
    pub fn reload<I, S>(&self, store: &mut HierarchyStateStore, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        store.reset_keeping_states(paths, self.separator, self.default_state);
    }
}

// =============================================================================
// Resource impl for HierarchyStateStore
// =============================================================================

impl Resource for HierarchyStateStore {}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PATHS: &[&str] = &["/root/left", "/root/right"];

    #[test]
    fn plugin_inserts_populated_store() {
        let mut app = App::new();
        app.add_plugins(HierarchyViewPlugin::from_paths(PATHS).header("scene"));

        let store = app.world().resource::<HierarchyStateStore>();
        assert_eq!(store.node_count(), 3);
        assert_eq!(store.serialize(), "[111,11]");
        assert_eq!(store.header(), "scene");
    }

    #[test]
    fn plugin_applies_options() {
        let mut app = App::new();
        app.add_plugins(
            HierarchyViewPlugin::from_paths(PATHS)
                .default_state(false)
                .legacy_states("1"),
        );

        let store = app.world().resource::<HierarchyStateStore>();
        assert_eq!(store.serialize(), "[100,00]");

        let settings = app.world().resource::<HierarchyViewSettings>();
        assert!(!settings.default_state);
    }

    #[test]
    fn empty_plugin_has_default_store() {
        let mut app = App::new();
        app.add_plugins(HierarchyViewPlugin::new());
        assert!(app.world().resource::<HierarchyStateStore>().is_default());
    }

    #[test]
    fn settings_reload_keeps_positions() {
        let settings = HierarchyViewSettings::default();
        let mut store = HierarchyStateStore::new();
        settings.reload(&mut store, PATHS);
        store.set_node_state(2, false).unwrap();

        settings.reload(&mut store, ["/root/left", "/root/right", "/root/up"]);
        assert_eq!(store.serialize(), "[1101,101]");
    }
}
