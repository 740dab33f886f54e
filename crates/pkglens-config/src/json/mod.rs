//! package.json parsing for local compatibility checks

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use pkglens_core::error::LensError;
use crate::ConfigResult;

/// The parts of a project's package.json that compatibility checks read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageJson {
    /// Package name, absent for private apps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Runtime dependencies
    #[serde(default)]
    pub dependencies: HashMap<String, String>,

    /// Development dependencies
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: HashMap<String, String>,

    /// Peer dependencies
    #[serde(default, rename = "peerDependencies")]
    pub peer_dependencies: HashMap<String, String>,

    /// Engine requirements
    #[serde(default)]
    pub engines: HashMap<String, String>,
}

impl PackageJson {
    /// Range the project declares for `name`, searching every dependency table
    pub fn declared_range(&self, name: &str) -> Option<&str> {
        self.dependencies
            .get(name)
            .or_else(|| self.dev_dependencies.get(name))
            .or_else(|| self.peer_dependencies.get(name))
            .map(String::as_str)
    }
}

/// Parse JSON string to PackageJson
pub fn parse_package_json(content: &str) -> ConfigResult<PackageJson> {
    serde_json::from_str(content)
        .map_err(|e| LensError::config("package.json", format!("JSON parsing error: {}", e)))
}

/// Load and parse package.json from file path
pub async fn load_from_file(path: &camino::Utf8Path) -> ConfigResult<PackageJson> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LensError::io(format!("Failed to read {}", path), e))?;

    parse_package_json(&content).map_err(|e| match e {
        LensError::ConfigValidation { reason, .. } => LensError::config(path.as_str(), reason),
        other => other,
    })
}
