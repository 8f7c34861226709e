use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::PluginManagerConfig;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::factory::{FactoryRegistry, PluginMetadata};
use crate::plugin_system::object::{Capability, Instance, OpaqueInstance};
use crate::plugin_system::record::PluginRecord;
use crate::utils::fs::{list_files_with_suffix, plugin_name_from_file};

/// Registry of loaded plugins, keyed by the name they were loaded under.
///
/// The manager never unloads anything on its own. Dropping it releases its
/// records, but a module stays mapped while any [`Instance`] or
/// [`OpaqueInstance`] created from it is alive.
///
/// Not internally synchronized; wrap it in a
/// [`SharedPluginManager`](crate::SharedPluginManager) to share it between
/// threads.
#[derive(Default)]
pub struct PluginManager {
    config: PluginManagerConfig,
    plugins: BTreeMap<String, PluginRecord>,
}

impl PluginManager {
    /// Create a manager searching the default plugin directory
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PluginManagerConfig) -> Self {
        Self {
            config,
            plugins: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &PluginManagerConfig {
        &self.config
    }

    /// Add a plugin directory to search, after the existing ones
    pub fn add_search_path<P: AsRef<Path>>(&mut self, dir: P) {
        self.config.search_paths.push(dir.as_ref().to_path_buf());
    }

    /// File name of plugin `name` on this platform: `name` plus the platform's
    /// library suffix (`.so`, `.dylib` or `.dll`).
    pub fn library_file_name(name: &str) -> String {
        format!("{}{}", name, DLL_SUFFIX)
    }

    /// File names tried for `name`, in order.
    pub fn candidate_file_names(&self, name: &str) -> Vec<String> {
        let mut names = vec![Self::library_file_name(name)];
        if self.config.try_lib_prefix && !DLL_PREFIX.is_empty() {
            names.push(format!("{}{}{}", DLL_PREFIX, name, DLL_SUFFIX));
        }
        names
    }

    /// Finds the file for plugin `name` in the search paths, without loading it.
    pub fn locate(&self, name: &str) -> Result<PathBuf, PluginSystemError> {
        let mut searched = Vec::new();
        for dir in &self.config.search_paths {
            for file_name in self.candidate_file_names(name) {
                let candidate = dir.join(file_name);
                if candidate.is_file() {
                    debug!("Located plugin '{}' at {}", name, candidate.display());
                    return Ok(candidate);
                }
                searched.push(candidate);
            }
        }
        Err(PluginSystemError::ModuleNotFound {
            target: name.to_string(),
            searched,
        })
    }

    /// Loads plugin `name` from the search paths.
    ///
    /// Fails with `AlreadyLoaded` if the name is taken; the existing plugin is
    /// left untouched. On any failure the plugin table is unchanged.
    pub fn load(&mut self, name: &str) -> Result<&FactoryRegistry, PluginSystemError> {
        self.ensure_not_loaded(name)?;
        let path = self.locate(name)?;
        self.insert(name, &path)
    }

    /// Loads the module at `path` under the name `name`.
    pub fn load_from_path<P: AsRef<Path>>(
        &mut self,
        name: &str,
        path: P,
    ) -> Result<&FactoryRegistry, PluginSystemError> {
        self.ensure_not_loaded(name)?;
        self.insert(name, path.as_ref())
    }

    fn ensure_not_loaded(&self, name: &str) -> Result<(), PluginSystemError> {
        if self.plugins.contains_key(name) {
            return Err(PluginSystemError::AlreadyLoaded {
                plugin_id: name.to_string(),
            });
        }
        Ok(())
    }

    fn insert(&mut self, name: &str, path: &Path) -> Result<&FactoryRegistry, PluginSystemError> {
        let record = PluginRecord::open(name, path)?;
        match self.plugins.entry(name.to_string()) {
            Entry::Occupied(_) => Err(PluginSystemError::AlreadyLoaded {
                plugin_id: name.to_string(),
            }),
            Entry::Vacant(slot) => {
                info!("Plugin '{}' loaded from {}", name, path.display());
                Ok(slot.insert(record).registry())
            }
        }
    }

    fn record(&self, name: &str) -> Result<&PluginRecord, PluginSystemError> {
        self.plugins
            .get(name)
            .ok_or_else(|| PluginSystemError::PluginNotFound {
                plugin_id: name.to_string(),
            })
    }

    /// Factory registry of a loaded plugin. Never loads anything.
    pub fn get_factory(&self, name: &str) -> Result<&FactoryRegistry, PluginSystemError> {
        self.record(name).map(PluginRecord::registry)
    }

    /// Name, version and exported classes of a loaded plugin.
    pub fn get_metadata(&self, name: &str) -> Result<PluginMetadata, PluginSystemError> {
        self.get_factory(name).map(FactoryRegistry::metadata)
    }

    /// Creates `class_name` from `plugin_name` without checking its interface.
    pub fn instantiate(
        &self,
        plugin_name: &str,
        class_name: &str,
    ) -> Result<OpaqueInstance, PluginSystemError> {
        self.record(plugin_name)?.create_instance(class_name)
    }

    /// Creates `class_name` from `plugin_name` as interface `I`.
    ///
    /// The class's registered capability must be `I::ID`, otherwise this
    /// fails with `CapabilityMismatch`.
    pub fn instantiate_as<I>(
        &self,
        plugin_name: &str,
        class_name: &str,
    ) -> Result<Instance<I>, PluginSystemError>
    where
        I: ?Sized + Capability,
    {
        self.record(plugin_name)?.create_instance_as::<I>(class_name)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Names of loaded plugins, sorted.
    pub fn plugin_names(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Live instances created from plugin `name`.
    pub fn live_instances(&self, name: &str) -> Result<usize, PluginSystemError> {
        self.record(name).map(PluginRecord::live_instances)
    }

    /// Unloads plugin `name`.
    ///
    /// Refused with `PluginInUse` while any instance created from it is
    /// alive; the plugin then stays loaded and usable.
    pub fn unload(&mut self, name: &str) -> Result<(), PluginSystemError> {
        let record = self
            .plugins
            .remove(name)
            .ok_or_else(|| PluginSystemError::PluginNotFound {
                plugin_id: name.to_string(),
            })?;
        record.unload().map_err(|(record, e)| {
            if let Some(record) = record {
                warn!("Refusing to unload plugin '{}': {}", name, e);
                self.plugins.insert(name.to_string(), record);
            }
            e
        })
    }

    /// Plugin names whose library files exist in the search paths.
    ///
    /// Only looks at file names; nothing is loaded.
    pub fn discover(&self) -> Vec<String> {
        let prefix = if self.config.try_lib_prefix { DLL_PREFIX } else { "" };
        let mut names = Vec::new();
        for dir in &self.config.search_paths {
            match list_files_with_suffix(dir, DLL_SUFFIX) {
                Ok(files) => names.extend(
                    files
                        .iter()
                        .filter_map(|file| plugin_name_from_file(file, prefix, DLL_SUFFIX)),
                ),
                Err(e) => debug!("Skipping plugin directory {}: {}", dir.display(), e),
            }
        }
        names.sort();
        names.dedup();
        names
    }
}

impl Debug for PluginManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginManager")
            .field("config", &self.config)
            .field("plugins", &self.plugins.keys().collect::<Vec<_>>())
            .finish()
    }
}
