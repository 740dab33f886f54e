//! Details of one published version

use std::collections::BTreeMap;

use pkglens_core::error::LensResult;
use pkglens_registry::RegistryClient;
use serde::Serialize;

use super::{fetch_version, Report};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionDetails {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub license: Option<String>,
    pub dependencies: BTreeMap<String, String>,
    pub peer_dependencies: BTreeMap<String, String>,
    /// Peer dependencies flagged optional in `peerDependenciesMeta`
    pub optional_peers: Vec<String>,
    pub engines: BTreeMap<String, String>,
    pub unpacked_size: Option<u64>,
    pub file_count: Option<u32>,
    pub tarball: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

/// Describe `name@version`, or the latest version when `version` is `None`
pub async fn version_details(
    client: &RegistryClient,
    name: &str,
    version: Option<&str>,
) -> Report<VersionDetails> {
    Report::from_result(collect(client, name, version).await)
}

async fn collect(client: &RegistryClient, name: &str, version: Option<&str>) -> LensResult<VersionDetails> {
    let meta = fetch_version(client, name, version).await?;

    let peer_dependencies: BTreeMap<String, String> = meta
        .peer_dependencies
        .clone()
        .unwrap_or_default()
        .into_iter()
        .collect();
    let optional_peers = peer_dependencies
        .keys()
        .filter(|peer| meta.is_optional_peer(peer))
        .cloned()
        .collect();

    Ok(VersionDetails {
        name: meta.name.clone().unwrap_or_else(|| name.to_string()),
        version: meta.version.clone(),
        description: meta.description.clone(),
        license: meta.license.as_ref().map(|l| l.identifier().to_string()),
        dependencies: meta.dependencies.clone().unwrap_or_default().into_iter().collect(),
        peer_dependencies,
        optional_peers,
        engines: meta.engines.clone().unwrap_or_default().into_iter().collect(),
        unpacked_size: meta.dist.unpacked_size,
        file_count: meta.dist.file_count,
        tarball: meta.dist.tarball.clone(),
        deprecated: meta.deprecated.clone(),
    })
}
