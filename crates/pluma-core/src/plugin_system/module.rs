use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use log::{debug, info, warn};

use crate::plugin_system::error::PluginSystemError;

/// A shared library mapped into the process.
///
/// The platform handle is held iff [`is_loaded`](ModuleHandle::is_loaded)
/// returns true. Unloading is idempotent and also happens on drop.
#[derive(Debug)]
pub struct ModuleHandle {
    path: PathBuf,
    library: Option<Library>,
}

impl ModuleHandle {
    /// Maps the module at `path`.
    ///
    /// Failures are reported once and never retried.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PluginSystemError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PluginSystemError::module_not_found(path));
        }

        // A bare file name would make the platform loader search the system
        // library paths instead of the current directory.
        let explicit = match path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Path::new(".").join(path),
            _ => path.to_path_buf(),
        };

        // SAFETY: mapping a module runs its initializers. Trusting the code we
        // are asked to load is the caller's decision.
        let library = unsafe { Library::new(&explicit) }.map_err(|e| PluginSystemError::LoadFailed {
            path: path.to_path_buf(),
            message: format!("libloading error: {}", e),
        })?;

        info!("Loaded module {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            library: Some(library),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.library.is_some()
    }

    /// Looks up an exported symbol by exact name.
    ///
    /// The returned [`Symbol`] borrows the handle, so it cannot be used after
    /// the module is unloaded.
    ///
    /// # Safety
    /// `T` must be the actual type of the exported symbol.
    pub unsafe fn resolve<T>(&self, symbol: &str) -> Result<Symbol<'_, T>, PluginSystemError> {
        let library = self
            .library
            .as_ref()
            .ok_or_else(|| PluginSystemError::ModuleUnloaded {
                path: self.path.clone(),
            })?;

        let resolved = unsafe { library.get::<T>(symbol.as_bytes()) }.map_err(|e| {
            PluginSystemError::SymbolNotFound {
                symbol: symbol.to_string(),
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;
        debug!("Resolved symbol '{}' in {}", symbol, self.path.display());
        Ok(resolved)
    }

    /// Releases the platform handle. A no-op when already unloaded.
    pub fn unload(&mut self) -> Result<(), PluginSystemError> {
        let Some(library) = self.library.take() else {
            return Ok(());
        };
        library.close().map_err(|e| PluginSystemError::UnloadFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        info!("Unloaded module {}", self.path.display());
        Ok(())
    }
}

impl Drop for ModuleHandle {
    fn drop(&mut self) {
        if let Err(e) = self.unload() {
            warn!("{}", e);
        }
    }
}
