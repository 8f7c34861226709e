//! # Pluma Configuration
//!
//! Where a [`PluginManager`](crate::PluginManager) looks for plugin files.
//!
//! Configuration is read from JSON, YAML (`yaml-config` feature) or TOML
//! (`toml-config` feature) files, picked by extension, and can be extended
//! from the `PLUMA_PLUGIN_PATH` environment variable.
pub mod error;

use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::kernel::constants::{DEFAULT_PLUGINS_DIR, PLUGIN_PATH_ENV};
pub use error::ConfigError;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }

    fn label(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "JSON",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "YAML",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "TOML",
        }
    }
}

/// Settings of a [`PluginManager`](crate::PluginManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginManagerConfig {
    /// Directories searched for plugin files, in order.
    pub search_paths: Vec<PathBuf>,
    /// Also try the platform library prefix (`libName.so`) when looking for
    /// plugin `Name`.
    pub try_lib_prefix: bool,
}

impl Default for PluginManagerConfig {
    fn default() -> Self {
        Self {
            search_paths: vec![PathBuf::from(DEFAULT_PLUGINS_DIR)],
            try_lib_prefix: true,
        }
    }
}

impl PluginManagerConfig {
    /// Config with the given search paths and default settings otherwise.
    pub fn with_search_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_paths: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Reads a config file, picking the format from its extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loading {} config from {}", format.label(), path.display());
        Self::parse(&text, format)
    }

    /// Parses config text in the given format.
    pub fn parse(text: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let deserialization = |message: String| ConfigError::Deserialization {
            format: format.label(),
            message,
        };
        match format {
            ConfigFormat::Json => serde_json::from_str(text).map_err(|e| deserialization(e.to_string())),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(text).map_err(|e| deserialization(e.to_string())),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(text).map_err(|e| deserialization(e.to_string())),
        }
    }

    /// Serialize to string based on format
    pub fn serialize(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        let serialization = |message: String| ConfigError::Serialization {
            format: format.label(),
            message,
        };
        match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self).map_err(|e| serialization(e.to_string())),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(self).map_err(|e| serialization(e.to_string())),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| serialization(e.to_string())),
        }
    }

    /// Appends the directories listed in `PLUMA_PLUGIN_PATH`, if set.
    pub fn apply_env(&mut self) {
        if let Some(value) = env::var_os(PLUGIN_PATH_ENV) {
            self.extend_search_paths(&value);
        }
    }

    /// Appends every directory in a platform path list (`a:b` on Unix,
    /// `a;b` on Windows). Empty entries are skipped.
    pub fn extend_search_paths(&mut self, path_list: &OsStr) {
        self.search_paths.extend(
            env::split_paths(path_list).filter(|path| !path.as_os_str().is_empty()),
        );
    }
}
