//! Utility functions and helpers.
//!
//! Common functionality used across multiple pkglens crates.

pub mod name;

pub use name::{encode_package_name, validate_exact_version, validate_package_name, MAX_NAME_LENGTH};
