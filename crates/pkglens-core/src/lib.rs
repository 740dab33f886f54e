//! # pkglens-core
//!
//! Core types and utilities shared across all pkglens crates.
//!
//! This crate provides:
//! - `LensError` and the `ErrorKind` taxonomy for unified error handling
//! - `PackageSpec` for `name@version` specifiers
//! - npm package name and version validation
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types
//! - `error`: Error types and result aliases
//! - `utils`: Validation and encoding helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{ErrorKind, LensError, LensResult};
pub use types::PackageSpec;
