//! Per-module table of exported classes.
//!
//! Exactly one [`FactoryRegistry`] exists per plugin module. It is built once
//! inside the module (see [`declare_plugin!`](crate::declare_plugin)), lives in
//! the module's static storage, and is only ever borrowed by the host.
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;

use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::ffi::AbiHeader;
use crate::plugin_system::object::{Capability, RawObject};

// Errors carry the panic message of a constructor that unwound.
type Constructor = Box<dyn Fn() -> Result<RawObject<'static>, String> + Send + Sync>;

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic reason".to_string()
    }
}

/// One exported class: its name, the interface it is exposed as, and the
/// constructor compiled into the module.
pub struct ClassEntry {
    class_name: String,
    capability: &'static str,
    constructor: Constructor,
}

impl ClassEntry {
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn capability(&self) -> &str {
        self.capability
    }
}

impl fmt::Debug for ClassEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassEntry")
            .field("class_name", &self.class_name)
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}

/// Plugin metadata plus the constructors of every exported class.
///
/// Entries keep registration order. Registration is expected to finish before
/// the first [`create`](FactoryRegistry::create); afterwards the registry is
/// read-only and `create` may be called from several threads at once, as long
/// as the plugin's constructors are themselves reentrant.
#[repr(C)]
pub struct FactoryRegistry {
    // Must stay the first field; the host reads it before anything else.
    header: AbiHeader,
    name: String,
    version: String,
    entries: Vec<ClassEntry>,
    registration_error: Option<String>,
}

impl FactoryRegistry {
    /// Creates an empty registry.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            header: AbiHeader::current(),
            name: name.into(),
            version: version.into(),
            entries: Vec::new(),
            registration_error: None,
        }
    }

    /// Creates a registry and runs `register` against it.
    ///
    /// A registration failure does not abort the module: it is recorded and
    /// the host refuses to load the plugin when it sees it. A panic in
    /// `register` is caught here, inside the module, and recorded the same
    /// way.
    pub fn build<F>(name: impl Into<String>, version: impl Into<String>, register: F) -> Self
    where
        F: FnOnce(&mut FactoryRegistry) -> Result<(), PluginSystemError>,
    {
        let mut registry = Self::new(name, version);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| register(&mut registry)));
        registry.registration_error = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(payload) => Some(format!("panic: {}", panic_message(payload.as_ref()))),
        };
        registry
    }

    pub fn header(&self) -> &AbiHeader {
        &self.header
    }

    /// Plugin name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Plugin version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Number of classes exported by the plugin
    pub fn class_count(&self) -> usize {
        self.entries.len()
    }

    /// Name of the class at `index`, in registration order.
    pub fn class_name_at(&self, index: usize) -> Result<&str, PluginSystemError> {
        self.entries
            .get(index)
            .map(ClassEntry::class_name)
            .ok_or(PluginSystemError::IndexOutOfRange {
                index,
                count: self.entries.len(),
            })
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassEntry> {
        self.entries.iter()
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.find(class_name).is_some()
    }

    /// Capability ID `class_name` was registered under.
    pub fn capability_of(&self, class_name: &str) -> Option<&str> {
        self.find(class_name).map(ClassEntry::capability)
    }

    /// Error recorded by [`build`](FactoryRegistry::build), if any.
    pub fn registration_error(&self) -> Option<&str> {
        self.registration_error.as_deref()
    }

    /// Registers `class_name`, exposed as interface `I`.
    ///
    /// Names must be non-empty and unique within this registry. The
    /// constructor runs under `catch_unwind` in the module that registered it,
    /// so a panic never crosses into the host.
    pub fn register<I>(
        &mut self,
        class_name: impl Into<String>,
        constructor: impl Fn() -> Box<I> + Send + Sync + 'static,
    ) -> Result<&mut Self, PluginSystemError>
    where
        I: ?Sized + Capability + Send,
    {
        let class_name = class_name.into();
        if class_name.is_empty() {
            return Err(PluginSystemError::InvalidClassName {
                plugin_id: self.name.clone(),
            });
        }
        if self.contains(&class_name) {
            return Err(PluginSystemError::DuplicateClass {
                plugin_id: self.name.clone(),
                class_name,
            });
        }
        self.entries.push(ClassEntry {
            class_name,
            capability: I::ID,
            constructor: Box::new(move || {
                panic::catch_unwind(AssertUnwindSafe(|| RawObject::new(constructor())))
                    .map_err(|payload| panic_message(payload.as_ref()))
            }),
        });
        Ok(self)
    }

    /// Instantiates `class_name`.
    ///
    /// An unknown name is an ordinary `ClassNotFound`, never a panic. A
    /// constructor that panicked is reported as `ConstructorPanicked`. The
    /// returned object borrows the registry; go through
    /// [`PluginManager::instantiate`](crate::PluginManager::instantiate) for a
    /// handle that can be kept around.
    pub fn create(&self, class_name: &str) -> Result<RawObject<'_>, PluginSystemError> {
        let entry = self
            .find(class_name)
            .ok_or_else(|| PluginSystemError::ClassNotFound {
                plugin_id: self.name.clone(),
                class_name: class_name.to_string(),
            })?;
        (entry.constructor)().map_err(|message| PluginSystemError::ConstructorPanicked {
            plugin_id: self.name.clone(),
            class_name: class_name.to_string(),
            message,
        })
    }

    /// Snapshot of the name, version and classes.
    pub fn metadata(&self) -> PluginMetadata {
        PluginMetadata::from(self)
    }

    fn find(&self, class_name: &str) -> Option<&ClassEntry> {
        self.entries.iter().find(|entry| entry.class_name == class_name)
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("entries", &self.entries)
            .field("registration_error", &self.registration_error)
            .finish()
    }
}

/// Owned description of a loaded plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginMetadata {
    pub name: String,
    pub version: String,
    pub classes: Vec<ClassInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassInfo {
    pub name: String,
    pub capability: String,
}

impl PluginMetadata {
    /// Class names in registration order.
    pub fn class_names(&self) -> Vec<&str> {
        self.classes.iter().map(|class| class.name.as_str()).collect()
    }
}

impl From<&FactoryRegistry> for PluginMetadata {
    fn from(registry: &FactoryRegistry) -> Self {
        Self {
            name: registry.name().to_string(),
            version: registry.version().to_string(),
            classes: registry
                .classes()
                .map(|entry| ClassInfo {
                    name: entry.class_name().to_string(),
                    capability: entry.capability().to_string(),
                })
                .collect(),
        }
    }
}
