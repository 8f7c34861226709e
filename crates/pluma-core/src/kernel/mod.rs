//! # Pluma Core Kernel
//!
//! Crate-wide pieces that do not belong to a single subsystem:
//!
//! - **Constants**: the entry-point symbol, ABI revision and default paths
//!   shared between the host and every plugin, in [`constants`].
//! - **Error Handling**: the aggregate [`Error`](error::Error) type and its
//!   `Result` alias, in [`error`].
pub mod constants;
pub mod error;

pub use error::{Error, Result};
