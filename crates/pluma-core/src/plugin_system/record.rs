use std::fmt;
use std::path::Path;
use std::ptr::NonNull;
use std::sync::Arc;

use log::{debug, info};

use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::factory::FactoryRegistry;
use crate::plugin_system::ffi::{AbiHeader, ENTRY_POINT_SYMBOL, EntryPointFn};
use crate::plugin_system::module::ModuleHandle;
use crate::plugin_system::object::{Capability, Instance, OpaqueInstance};

/// A loaded module together with the registry its entry point returned.
///
/// Shared between the owning [`PluginRecord`] and every instance created from
/// it; the module is unmapped when the last of them is dropped.
pub(crate) struct PluginModule {
    name: String,
    // Borrowed from `module`'s static storage, valid while `module` is loaded.
    registry: NonNull<FactoryRegistry>,
    module: ModuleHandle,
}

// SAFETY: the registry is immutable once the entry point has returned, and its
// constructors are `Send + Sync`. `Library` is itself `Send + Sync`.
unsafe impl Send for PluginModule {}
unsafe impl Sync for PluginModule {}

impl PluginModule {
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    fn registry(&self) -> &FactoryRegistry {
        // SAFETY: `module` is never unloaded while `self` is alive; see
        // `PluginRecord::unload`, which requires exclusive ownership first.
        unsafe { self.registry.as_ref() }
    }
}

/// A plugin that was fully loaded: module mapped, entry point invoked and its
/// registry validated.
pub struct PluginRecord {
    module: Arc<PluginModule>,
}

impl PluginRecord {
    /// Loads the module at `path` and binds it to its factory registry.
    ///
    /// Either every step succeeds or the module is unloaded again and the
    /// error is returned; a half-loaded record is never produced.
    pub fn open<P: AsRef<Path>>(name: &str, path: P) -> Result<Self, PluginSystemError> {
        let module = ModuleHandle::load(path)?;

        // SAFETY: every plugin exports the entry point with this signature.
        let entry: EntryPointFn = match unsafe { module.resolve::<EntryPointFn>(ENTRY_POINT_SYMBOL) } {
            Ok(symbol) => *symbol,
            Err(PluginSystemError::SymbolNotFound { symbol, path, .. }) => {
                return Err(PluginSystemError::EntryPointMissing {
                    plugin_id: name.to_string(),
                    symbol,
                    path,
                });
            }
            Err(other) => return Err(other),
        };

        // SAFETY: `extern "C"` cannot unwind into the host; a panic escaping a
        // hand-written entry point aborts inside the module.
        let raw = unsafe { entry() };
        let registry = NonNull::new(raw.cast_mut()).ok_or_else(|| {
            PluginSystemError::EntryPointFailed {
                plugin_id: name.to_string(),
                message: "entry point returned a null factory registry".to_string(),
            }
        })?;

        // SAFETY: `FactoryRegistry` is `repr(C)` with the header as its first
        // field, and the header's layout does not depend on the build.
        let header = unsafe { registry.cast::<AbiHeader>().as_ref() };
        unsafe { header.check_compatible() }.map_err(|e| PluginSystemError::LoadFailed {
            path: module.path().to_path_buf(),
            message: format!("ABI mismatch: {}", e),
        })?;

        // SAFETY: header checked; the rest of the registry has our layout.
        let registry_ref = unsafe { registry.as_ref() };
        if let Some(message) = registry_ref.registration_error() {
            return Err(PluginSystemError::RegistrationFailed {
                plugin_id: name.to_string(),
                message: message.to_string(),
            });
        }

        info!(
            "Opened plugin '{}' ({} v{}, {} classes) from {}",
            name,
            registry_ref.name(),
            registry_ref.version(),
            registry_ref.class_count(),
            module.path().display()
        );
        Ok(Self {
            module: Arc::new(PluginModule {
                name: name.to_string(),
                registry,
                module,
            }),
        })
    }

    /// Name the plugin was loaded under.
    pub fn name(&self) -> &str {
        self.module.name()
    }

    pub fn path(&self) -> &Path {
        self.module.module.path()
    }

    pub fn registry(&self) -> &FactoryRegistry {
        self.module.registry()
    }

    /// Number of instances created from this plugin that are still alive.
    pub fn live_instances(&self) -> usize {
        Arc::strong_count(&self.module) - 1
    }

    /// Instantiates `class_name` without checking its interface.
    pub fn create_instance(&self, class_name: &str) -> Result<OpaqueInstance, PluginSystemError> {
        let created = self.registry().create(class_name)?;

        debug!(
            "Created '{}' from plugin '{}' ({})",
            class_name,
            self.name(),
            created.capability()
        );
        // SAFETY: the instance keeps its own reference to the module, so the
        // module outlives the object.
        let instance = unsafe {
            OpaqueInstance::new(created.detach(), class_name.to_string(), Arc::clone(&self.module))
        };
        Ok(instance)
    }

    /// Instantiates `class_name` as interface `I`.
    ///
    /// The registered capability is checked before the constructor runs; a
    /// mismatch is a `CapabilityMismatch` error.
    pub fn create_instance_as<I>(&self, class_name: &str) -> Result<Instance<I>, PluginSystemError>
    where
        I: ?Sized + Capability,
    {
        let registry = self.registry();
        let found = registry
            .capability_of(class_name)
            .ok_or_else(|| PluginSystemError::ClassNotFound {
                plugin_id: registry.name().to_string(),
                class_name: class_name.to_string(),
            })?;
        if found != I::ID {
            return Err(PluginSystemError::CapabilityMismatch {
                class_name: class_name.to_string(),
                expected: I::ID.to_string(),
                found: found.to_string(),
            });
        }

        self.create_instance(class_name)?
            .downcast::<I>()
            .map_err(|opaque| PluginSystemError::CapabilityMismatch {
                class_name: class_name.to_string(),
                expected: I::ID.to_string(),
                found: opaque.capability().to_string(),
            })
    }

    /// Unloads the module.
    ///
    /// Refused with `PluginInUse` while instances are alive, in which case
    /// the record is handed back unchanged. Fails with `UnloadFailed` if the
    /// platform loader rejects the close; the handle is released regardless,
    /// so nothing is returned.
    pub fn unload(self) -> Result<(), (Option<PluginRecord>, PluginSystemError)> {
        let live = self.live_instances();
        if live > 0 {
            let plugin_id = self.name().to_string();
            return Err((Some(self), PluginSystemError::PluginInUse { plugin_id, live }));
        }
        let name = self.name().to_string();
        match Arc::try_unwrap(self.module) {
            Ok(mut inner) => {
                inner.module.unload().map_err(|e| (None, e))?;
                info!("Unloaded plugin '{}'", name);
                Ok(())
            }
            Err(module) => {
                let live = Arc::strong_count(&module) - 1;
                let error = PluginSystemError::PluginInUse { plugin_id: name, live };
                Err((Some(PluginRecord { module }), error))
            }
        }
    }
}

impl fmt::Debug for PluginRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRecord")
            .field("name", &self.name())
            .field("path", &self.path())
            .field("registry", self.registry())
            .field("live_instances", &self.live_instances())
            .finish()
    }
}
