//! Core data types shared by the pkglens crates.

pub mod spec;

pub use spec::PackageSpec;
