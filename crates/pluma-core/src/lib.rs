//! # Pluma Core
//!
//! Loads shared code modules at runtime, reads the factory registry each
//! module exports, and instantiates the classes it registers behind
//! capability-checked handles.
//!
//! The crate is split the same way a loaded plugin is:
//!
//! - [`plugin_system`]: module handles, factory registries, plugin records and
//!   the [`PluginManager`] that ties them together.
//! - [`config`]: where the manager looks for plugin files.
//! - [`kernel`]: constants shared with plugins and the crate-wide error type.
//! - [`utils`]: filesystem helpers used for plugin discovery.
pub mod config;
pub mod kernel;
pub mod plugin_system;
pub mod utils;

pub use config::PluginManagerConfig;
pub use kernel::error::Error as KernelError;
pub use plugin_system::{
    Capability, FactoryRegistry, Instance, OpaqueInstance, PluginManager, PluginMetadata,
    PluginSystemError, SharedPluginManager,
};
