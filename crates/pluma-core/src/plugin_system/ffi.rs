//! The only ABI surface between the host and a plugin module.
//!
//! A plugin exports one function, [`ENTRY_POINT_SYMBOL`], that returns a
//! pointer to a [`FactoryRegistry`] living in the module's static storage.
//! `FactoryRegistry` is `#[repr(C)]` and starts with an [`AbiHeader`], so the
//! host can check the header before it reads anything whose layout depends on
//! the compiler and pluma-core version the plugin was built with.
//!
//! Plugins are expected to be built by the same compiler as the host, against
//! a compatible pluma-core, using the default global allocator: created
//! objects are allocated inside the module and freed by the host.
//!
//! A module links its own copy of `std`, so a panic raised in it can only be
//! caught by code compiled into the same module. Registration and
//! constructors are wrapped in `catch_unwind` on the module side (see
//! [`FactoryRegistry::build`] and [`FactoryRegistry::register`]); the entry
//! point is `extern "C"`, so anything that still escapes aborts at the
//! boundary instead of unwinding through the host.
use std::ffi::{c_char, CStr};

use crate::kernel::constants::{ABI_VERSION, CORE_VERSION_C};
use crate::plugin_system::factory::FactoryRegistry;
use crate::plugin_system::version::{VersionError, VersionRange};

pub use crate::kernel::constants::ENTRY_POINT_SYMBOL;

/// Signature of the exported entry point.
pub type EntryPointFn = unsafe extern "C" fn() -> *const FactoryRegistry;

/// Fixed-layout prefix of every [`FactoryRegistry`].
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AbiHeader {
    pub abi_version: u32,
    /// NUL-terminated pluma-core version the plugin was compiled against.
    pub core_version: *const c_char,
}

// SAFETY: `core_version` only ever points at a 'static, immutable C string.
unsafe impl Send for AbiHeader {}
unsafe impl Sync for AbiHeader {}

impl AbiHeader {
    /// Header describing the pluma-core being compiled.
    pub const fn current() -> Self {
        Self {
            abi_version: ABI_VERSION,
            core_version: CORE_VERSION_C.as_ptr(),
        }
    }

    /// Reads the embedded core version.
    ///
    /// # Safety
    /// `core_version` must be null or point to a NUL-terminated string that
    /// stays valid for the returned lifetime.
    pub unsafe fn core_version(&self) -> Option<&str> {
        if self.core_version.is_null() {
            return None;
        }
        unsafe { CStr::from_ptr(self.core_version) }.to_str().ok()
    }

    /// Checks that a plugin carrying this header can be read by this host.
    ///
    /// # Safety
    /// Same contract as [`AbiHeader::core_version`].
    pub unsafe fn check_compatible(&self) -> Result<(), VersionError> {
        if self.abi_version != ABI_VERSION {
            return Err(VersionError::Incompatible {
                found: format!("abi {}", self.abi_version),
                required: format!("abi {}", ABI_VERSION),
            });
        }
        let core_version = unsafe { self.core_version() }.ok_or_else(|| {
            VersionError::ParseError("missing or non UTF-8 core version".to_string())
        })?;
        VersionRange::host_compatible()?.check(core_version)
    }
}

/// Exports the entry point of a plugin module.
///
/// The registration closure runs exactly once, the first time the host calls
/// the entry point, and the resulting registry lives in a static inside the
/// module until it is unloaded. If the closure fails or panics the registry
/// carries the error and the host refuses the plugin.
///
/// ```ignore
/// pluma_core::declare_plugin!("MathOps", "1.0.0", |factory| {
///     factory.register::<dyn MathFunction>("Exp", || Box::new(Exp))?;
///     Ok(())
/// });
/// ```
#[macro_export]
macro_rules! declare_plugin {
    ($name:expr, $version:expr, $register:expr $(,)?) => {
        #[unsafe(no_mangle)]
        #[allow(improper_ctypes_definitions)]
        pub extern "C" fn pluma_plugin_entry()
        -> *const $crate::plugin_system::FactoryRegistry {
            static FACTORY: ::std::sync::OnceLock<$crate::plugin_system::FactoryRegistry> =
                ::std::sync::OnceLock::new();
            FACTORY.get_or_init(|| {
                $crate::plugin_system::FactoryRegistry::build($name, $version, $register)
            })
        }
    };
}
