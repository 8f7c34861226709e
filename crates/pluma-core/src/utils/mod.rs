//! # Pluma Core Utilities
//!
//! Filesystem helpers used by plugin discovery.
pub mod fs;
