//! Package overview

use pkglens_core::error::LensResult;
use pkglens_core::utils::validate_package_name;
use pkglens_registry::RegistryClient;
use serde::Serialize;

use super::{normalize_repository_url, Report};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageInfo {
    pub name: String,
    pub latest_version: Option<String>,
    pub description: Option<String>,
    pub license: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
    pub keywords: Vec<String>,
    pub maintainers: Vec<String>,
    pub version_count: usize,
    pub created: Option<String>,
    pub modified: Option<String>,
    /// Deprecation notice of the latest version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

/// Summarize a package from its registry document
pub async fn package_info(client: &RegistryClient, name: &str) -> Report<PackageInfo> {
    Report::from_result(collect(client, name).await)
}

async fn collect(client: &RegistryClient, name: &str) -> LensResult<PackageInfo> {
    validate_package_name(name)?;
    let packument = client.get_package_metadata(name).await?;
    let latest = packument.latest();

    // Older documents only carry these fields on the version objects
    let description = packument
        .description
        .clone()
        .or_else(|| latest.and_then(|v| v.description.clone()));
    let license = packument
        .license
        .as_ref()
        .or_else(|| latest.and_then(|v| v.license.as_ref()))
        .map(|license| license.identifier().to_string());
    let repository = packument
        .repository
        .as_ref()
        .or_else(|| latest.and_then(|v| v.repository.as_ref()))
        .and_then(|repo| repo.url())
        .map(normalize_repository_url);
    let keywords = packument
        .keywords
        .clone()
        .or_else(|| latest.and_then(|v| v.keywords.clone()))
        .unwrap_or_default();

    Ok(PackageInfo {
        name: packument.name.clone(),
        latest_version: packument.latest_version().map(str::to_string),
        description,
        license,
        homepage: packument.homepage.clone(),
        repository,
        keywords,
        maintainers: packument
            .maintainers
            .iter()
            .map(|person| person.name().to_string())
            .collect(),
        version_count: packument.versions.len(),
        created: packument.created().map(str::to_string),
        modified: packument.modified().map(str::to_string),
        deprecated: latest.and_then(|v| v.deprecated.clone()),
    })
}
