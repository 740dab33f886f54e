//! Package analysis tools built on the registry client.
//!
//! Every tool validates its input, queries the registry and condenses the
//! answer into a serializable report. Failures, including unknown packages,
//! come back as a report with `success: false` rather than as an error.

use pkglens_core::error::{LensError, LensResult};
use pkglens_core::utils::{validate_exact_version, validate_package_name};
use pkglens_registry::{RegistryClient, VersionMetadata};
use serde::Serialize;

pub mod compat;
pub mod downloads;
pub mod info;
pub mod score;
pub mod search;
pub mod size;
pub mod version;

#[cfg(test)]
mod tests;

/// Outcome of a tool run, flattened into a single JSON object
#[derive(Debug, Clone, Serialize)]
pub struct Report<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T> Report<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            error: None,
            suggestion: None,
            data: Some(data),
        }
    }

    pub fn failed(error: &LensError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            suggestion: error.suggestion().map(str::to_string),
            data: None,
        }
    }

    pub fn from_result(result: LensResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => {
                tracing::debug!(error = %err, "tool run failed");
                Self::failed(&err)
            },
        }
    }
}

/// Resolve the metadata of `version`, or of the `latest` dist-tag when absent
pub(crate) async fn fetch_version(
    client: &RegistryClient,
    name: &str,
    version: Option<&str>,
) -> LensResult<VersionMetadata> {
    validate_package_name(name)?;

    match version {
        Some(version) => {
            let exact = validate_exact_version(version)?;
            client
                .get_package_version_metadata(name, &exact.to_string())
                .await
        },
        None => {
            let packument = client.get_package_metadata(name).await?;
            let latest = packument
                .latest_version()
                .ok_or_else(|| LensError::not_found(format!("Latest version of '{}'", name)))?
                .to_string();
            packument
                .versions
                .get(&latest)
                .cloned()
                .ok_or_else(|| LensError::not_found(format!("Version '{}@{}'", name, latest)))
        },
    }
}

/// Strip the `git+` prefix and `.git` suffix npm repository URLs usually carry
pub(crate) fn normalize_repository_url(url: &str) -> String {
    let url = url.trim();
    let url = url.strip_prefix("git+").unwrap_or(url);
    let url = url.strip_suffix(".git").unwrap_or(url);
    if let Some(path) = url.strip_prefix("github:") {
        return format!("https://github.com/{}", path);
    }
    url.replacen("git://", "https://", 1)
}
