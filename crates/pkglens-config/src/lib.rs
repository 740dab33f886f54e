//! Configuration loading for pkglens
//!
//! Handles parsing and validation of pkglens.toml, layering of global,
//! project and environment settings, and reading project package.json files.

pub mod toml;
pub mod json;
pub mod merge;

// Re-export main types
pub use toml::{
    ColorChoice, LensToml, OutputSection, OutputSettings, RegistrySection, RegistrySettings,
    Settings,
};
pub use json::PackageJson;
pub use merge::{ConfigLayering, ConfigLoader, ConfigSource};

use pkglens_core::error::LensError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, LensError>;
