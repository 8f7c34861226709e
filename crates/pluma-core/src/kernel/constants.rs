use std::ffi::CStr;

/// Application name
pub const APP_NAME: &str = "pluma";

/// Version of pluma-core. A plugin embeds the value it was compiled against.
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// [`CORE_VERSION`] as a NUL-terminated string for the ABI header.
pub const CORE_VERSION_C: &CStr =
    match CStr::from_bytes_with_nul(concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes()) {
        Ok(version) => version,
        Err(_) => panic!("package version contains an interior NUL byte"),
    };

/// Layout revision of `FactoryRegistry` and the objects it creates.
///
/// Bump whenever `FactoryRegistry`, `ClassEntry` or `RawObject` change shape.
pub const ABI_VERSION: u32 = 1;

/// Symbol every plugin module must export.
pub const ENTRY_POINT_SYMBOL: &str = "pluma_plugin_entry";

/// Default plugin search directory
pub const DEFAULT_PLUGINS_DIR: &str = ".";

/// Environment variable holding extra plugin directories (platform path-list syntax)
pub const PLUGIN_PATH_ENV: &str = "PLUMA_PLUGIN_PATH";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "pluma.toml";
