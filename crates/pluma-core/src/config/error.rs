//! # Pluma Configuration Errors
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error while reading config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown or unsupported config format for path: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to deserialize config from {format}: {message}")]
    Deserialization { format: &'static str, message: String },

    #[error("Failed to serialize config to {format}: {message}")]
    Serialization { format: &'static str, message: String },
}
