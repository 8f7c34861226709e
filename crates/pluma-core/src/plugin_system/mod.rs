//! # Pluma Plugin System
//!
//! Loads shared libraries at runtime and instantiates the classes they export.
//! Components, leaf first:
//!
//! - **[`module`]**: [`ModuleHandle`], one mapped shared library. Resolves
//!   symbols and unloads.
//! - **[`factory`]**: [`FactoryRegistry`], the table a module builds of its
//!   exported classes, plus plugin name and version.
//! - **[`object`]**: capability-tagged objects ([`RawObject`]) and the owning
//!   handles ([`Instance`], [`OpaqueInstance`]) that keep a module mapped.
//! - **[`record`]**: [`PluginRecord`], a module bound to the registry its entry
//!   point returned.
//! - **[`manager`]**: [`PluginManager`], the table of loaded plugins, and
//!   [`SharedPluginManager`] for sharing it between threads.
//! - **[`ffi`]**: the entry-point contract and the [`declare_plugin!`](crate::declare_plugin)
//!   macro plugins use to satisfy it.
//! - **[`version`]**: semver checks applied to a plugin's ABI header.
//! - **[`error`]**: [`PluginSystemError`].
//!
//! ## Object lifetimes
//!
//! Every object a plugin creates runs code that lives in the plugin's module,
//! so the module must outlive the object. Instances hold a counted reference
//! to their module, and [`PluginManager::unload`] is refused while that count
//! is non-zero. Dropping the manager never unmaps a module that still has
//! live instances; it is unmapped when the last one goes away.
pub mod error;
pub mod factory;
pub mod ffi;
pub mod manager;
pub mod module;
pub mod object;
pub mod record;
pub mod shared;
pub mod version;

pub use error::PluginSystemError;
pub use factory::{ClassEntry, ClassInfo, FactoryRegistry, PluginMetadata};
pub use ffi::{AbiHeader, ENTRY_POINT_SYMBOL, EntryPointFn};
pub use manager::PluginManager;
pub use module::ModuleHandle;
pub use object::{Capability, Instance, OpaqueInstance, RawObject};
pub use record::PluginRecord;
pub use shared::SharedPluginManager;
pub use version::{VersionError, VersionRange};

// Test module declaration
#[cfg(test)]
mod tests;
