//! `name@version` package specifiers as typed on the command line.

use crate::error::{LensError, LensResult};
use crate::utils::{validate_exact_version, validate_package_name};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated package name with an optional exact version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    pub name: String,
    pub version: Option<String>,
}

impl PackageSpec {
    /// Create a spec for the given name without a version
    pub fn new(name: impl Into<String>) -> LensResult<Self> {
        let name = name.into();
        validate_package_name(&name)?;
        Ok(Self {
            name,
            version: None,
        })
    }

    /// Attach an exact version to this spec
    pub fn with_version(mut self, version: impl Into<String>) -> LensResult<Self> {
        let version = version.into();
        validate_exact_version(&version)?;
        self.version = Some(version);
        Ok(self)
    }

    /// Whether the name carries an `@scope/` prefix
    pub fn is_scoped(&self) -> bool {
        self.name.starts_with('@')
    }
}

impl FromStr for PackageSpec {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // The version separator is the last '@' that is not the scope marker
        let split_at = s.rfind('@').filter(|&idx| idx > 0);

        match split_at {
            Some(idx) => {
                let (name, version) = (&s[..idx], &s[idx + 1..]);
                if version.is_empty() {
                    return Err(LensError::invalid_input(
                        "package spec",
                        format!("'{}' has an empty version after '@'", s),
                    ));
                }
                Self::new(name)?.with_version(version)
            },
            None => Self::new(s),
        }
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}
