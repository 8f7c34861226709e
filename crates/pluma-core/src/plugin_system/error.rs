//! # Pluma Plugin System Errors
//!
//! Defines [`PluginSystemError`], the single enum covering every failure the
//! plugin system reports. Load-time variants (`ModuleNotFound`, `LoadFailed`,
//! `EntryPointMissing`, ...) mean the plugin is unusable and nothing was
//! stored. Lookup variants (`PluginNotFound`, `ClassNotFound`,
//! `IndexOutOfRange`) are ordinary, recoverable answers to a query.
//!
//! Using an object after its module was unmapped is not represented here: the
//! handle types make it unreachable instead.
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PluginSystemError {
    #[error("Plugin module '{target}' not found (searched: {})", display_paths(.searched))]
    ModuleNotFound {
        target: String,
        searched: Vec<PathBuf>,
    },

    #[error("Failed to load module '{}': {message}", path.display())]
    LoadFailed { path: PathBuf, message: String },

    #[error("Failed to unload module '{}': {message}", path.display())]
    UnloadFailed { path: PathBuf, message: String },

    #[error("Symbol '{symbol}' not found in module '{}': {message}", path.display())]
    SymbolNotFound {
        symbol: String,
        path: PathBuf,
        message: String,
    },

    #[error("Module '{}' has been unloaded", path.display())]
    ModuleUnloaded { path: PathBuf },

    #[error("Plugin '{plugin_id}' does not export the entry point '{symbol}' ({})", path.display())]
    EntryPointMissing {
        plugin_id: String,
        symbol: String,
        path: PathBuf,
    },

    #[error("Entry point of plugin '{plugin_id}' failed: {message}")]
    EntryPointFailed { plugin_id: String, message: String },

    #[error("Plugin '{plugin_id}' rejected its own class registrations: {message}")]
    RegistrationFailed { plugin_id: String, message: String },

    #[error("Plugin '{plugin_id}' is already loaded")]
    AlreadyLoaded { plugin_id: String },

    #[error("Plugin '{plugin_id}' is not loaded")]
    PluginNotFound { plugin_id: String },

    #[error("Plugin '{plugin_id}' does not export a class named '{class_name}'")]
    ClassNotFound {
        plugin_id: String,
        class_name: String,
    },

    #[error("Class index {index} out of range (plugin exports {count} classes)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Plugin '{plugin_id}' registers class '{class_name}' more than once")]
    DuplicateClass {
        plugin_id: String,
        class_name: String,
    },

    #[error("Plugin '{plugin_id}' tried to register a class with an empty name")]
    InvalidClassName { plugin_id: String },

    #[error("Class '{class_name}' implements '{found}', not the requested '{expected}'")]
    CapabilityMismatch {
        class_name: String,
        expected: String,
        found: String,
    },

    #[error("Constructor of '{class_name}' in plugin '{plugin_id}' panicked: {message}")]
    ConstructorPanicked {
        plugin_id: String,
        class_name: String,
        message: String,
    },

    #[error("Plugin '{plugin_id}' still has {live} live instance(s) and cannot be unloaded")]
    PluginInUse { plugin_id: String, live: usize },
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "<no search paths>".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl PluginSystemError {
    /// Builds the error for a single missing file.
    pub fn module_not_found(path: &Path) -> Self {
        PluginSystemError::ModuleNotFound {
            target: path.display().to_string(),
            searched: vec![path.to_path_buf()],
        }
    }

    /// True for the expected "no such plugin/class/index" answers.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(
            self,
            PluginSystemError::PluginNotFound { .. }
                | PluginSystemError::ClassNotFound { .. }
                | PluginSystemError::IndexOutOfRange { .. }
        )
    }
}
