use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::factory::PluginMetadata;
use crate::plugin_system::manager::PluginManager;
use crate::plugin_system::object::{Capability, Instance, OpaqueInstance};

/// A [`PluginManager`] behind a single read/write lock, for use from several
/// threads.
///
/// Loading and unloading take the write lock, so a plugin becomes visible to
/// other threads only once it is completely loaded. Lookups and instantiation
/// share the read lock. The handles returned do not borrow the lock.
#[derive(Clone, Default)]
pub struct SharedPluginManager {
    inner: Arc<RwLock<PluginManager>>,
}

impl SharedPluginManager {
    pub fn new(manager: PluginManager) -> Self {
        Self {
            inner: Arc::new(RwLock::new(manager)),
        }
    }

    pub fn load(&self, name: &str) -> Result<PluginMetadata, PluginSystemError> {
        self.inner.write().load(name).map(|registry| registry.metadata())
    }

    pub fn load_from_path<P: AsRef<Path>>(
        &self,
        name: &str,
        path: P,
    ) -> Result<PluginMetadata, PluginSystemError> {
        self.inner
            .write()
            .load_from_path(name, path)
            .map(|registry| registry.metadata())
    }

    pub fn get_metadata(&self, name: &str) -> Result<PluginMetadata, PluginSystemError> {
        self.inner.read().get_metadata(name)
    }

    pub fn instantiate(
        &self,
        plugin_name: &str,
        class_name: &str,
    ) -> Result<OpaqueInstance, PluginSystemError> {
        self.inner.read().instantiate(plugin_name, class_name)
    }

    pub fn instantiate_as<I>(
        &self,
        plugin_name: &str,
        class_name: &str,
    ) -> Result<Instance<I>, PluginSystemError>
    where
        I: ?Sized + Capability,
    {
        self.inner.read().instantiate_as::<I>(plugin_name, class_name)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.inner.read().is_loaded(name)
    }

    pub fn plugin_names(&self) -> Vec<String> {
        self.inner.read().plugin_names().map(str::to_string).collect()
    }

    pub fn unload(&self, name: &str) -> Result<(), PluginSystemError> {
        self.inner.write().unload(name)
    }

    /// Runs `f` with shared access to the manager.
    pub fn with_manager<R>(&self, f: impl FnOnce(&PluginManager) -> R) -> R {
        f(&self.inner.read())
    }
}

impl Debug for SharedPluginManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Avoid blocking in Debug
        match self.inner.try_read() {
            Some(manager) => f.debug_tuple("SharedPluginManager").field(&*manager).finish(),
            None => f.debug_struct("SharedPluginManager").finish_non_exhaustive(),
        }
    }
}
