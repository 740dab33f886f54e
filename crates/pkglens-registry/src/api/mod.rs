//! npm registry API response types

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use pkglens_core::error::LensError;
use serde::{Deserialize, Serialize};

mod lenient;

/// Full package document ("packument") from the npm registry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Packument {
    /// Package name
    pub name: String,
    /// Package description
    #[serde(default, deserialize_with = "lenient::option")]
    pub description: Option<String>,
    /// Named version pointers such as `latest`
    #[serde(rename = "dist-tags", default, deserialize_with = "lenient::string_map")]
    pub dist_tags: HashMap<String, String>,
    /// All versions metadata; entries that cannot be read at all are skipped
    #[serde(default, deserialize_with = "lenient::map")]
    pub versions: HashMap<String, VersionMetadata>,
    /// Publish timestamps, keyed by version plus `created` and `modified`
    ///
    /// Non-string entries such as the `unpublished` record are dropped.
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub time: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub maintainers: Vec<Person>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub license: Option<License>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub repository: Option<RepositoryInfo>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub homepage: Option<String>,
    #[serde(default, deserialize_with = "lenient::keywords")]
    pub keywords: Option<Vec<String>>,
    /// README body, only present on the full (non-abbreviated) document
    #[serde(default, deserialize_with = "lenient::option")]
    pub readme: Option<String>,
}

impl Packument {
    /// Version pointed to by the `latest` dist-tag
    pub fn latest_version(&self) -> Option<&str> {
        self.dist_tags.get("latest").map(String::as_str)
    }

    /// Metadata of the `latest` version, if it is present in `versions`
    pub fn latest(&self) -> Option<&VersionMetadata> {
        self.latest_version().and_then(|v| self.versions.get(v))
    }

    pub fn created(&self) -> Option<&str> {
        self.time.get("created").map(String::as_str)
    }

    pub fn modified(&self) -> Option<&str> {
        self.time.get("modified").map(String::as_str)
    }
}

/// Metadata for a specific package version
///
/// Old publishes carry legacy shapes (`"engines": ["node >= 0.4"]`,
/// `"keywords": "a, b"`); fields that do not fit read as absent.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VersionMetadata {
    /// Package name
    #[serde(default, deserialize_with = "lenient::option")]
    pub name: Option<String>,
    /// Version string
    pub version: String,
    /// Package description
    #[serde(default, deserialize_with = "lenient::option")]
    pub description: Option<String>,
    /// Main entry point
    #[serde(default, deserialize_with = "lenient::option")]
    pub main: Option<String>,
    /// License
    #[serde(default, deserialize_with = "lenient::option")]
    pub license: Option<License>,
    /// Repository information
    #[serde(default, deserialize_with = "lenient::option")]
    pub repository: Option<RepositoryInfo>,
    /// Keywords
    #[serde(default, deserialize_with = "lenient::keywords")]
    pub keywords: Option<Vec<String>>,
    /// Dependencies
    #[serde(default, deserialize_with = "lenient::option")]
    pub dependencies: Option<HashMap<String, String>>,
    /// Dev dependencies
    #[serde(rename = "devDependencies", default, deserialize_with = "lenient::option")]
    pub dev_dependencies: Option<HashMap<String, String>>,
    /// Peer dependencies
    #[serde(rename = "peerDependencies", default, deserialize_with = "lenient::option")]
    pub peer_dependencies: Option<HashMap<String, String>>,
    /// Peer dependencies the consumer may leave out
    #[serde(rename = "peerDependenciesMeta", default, deserialize_with = "lenient::option")]
    pub peer_dependencies_meta: Option<HashMap<String, PeerDependencyMeta>>,
    /// Runtime engine requirements, e.g. `{"node": ">=14"}`
    #[serde(default, deserialize_with = "lenient::option")]
    pub engines: Option<HashMap<String, String>>,
    /// Deprecation message, when the version has been deprecated
    #[serde(default, deserialize_with = "lenient::option")]
    pub deprecated: Option<String>,
    /// Distribution information
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub dist: DistInfo,
}

impl VersionMetadata {
    /// Whether the peer dependency `name` is marked optional
    pub fn is_optional_peer(&self, name: &str) -> bool {
        self.peer_dependencies_meta
            .as_ref()
            .and_then(|meta| meta.get(name))
            .map(|meta| meta.optional)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PeerDependencyMeta {
    #[serde(default)]
    pub optional: bool,
}

/// License field: an SPDX string or the legacy `{ "type": ... }` object
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum License {
    Spdx(String),
    Legacy {
        #[serde(rename = "type")]
        license_type: String,
        #[serde(default)]
        url: Option<String>,
    },
}

impl License {
    pub fn identifier(&self) -> &str {
        match self {
            License::Spdx(id) => id,
            License::Legacy { license_type, .. } => license_type,
        }
    }
}

/// Repository information
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RepositoryInfo {
    /// Shorthand such as `github:user/repo` or a bare URL
    Simple(String),
    /// Detailed repository object
    Detailed {
        /// Repository type (usually "git")
        #[serde(rename = "type", default)]
        repo_type: Option<String>,
        /// Repository URL
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        directory: Option<String>,
    },
}

impl RepositoryInfo {
    pub fn url(&self) -> Option<&str> {
        match self {
            RepositoryInfo::Simple(url) => Some(url),
            RepositoryInfo::Detailed { url, .. } => url.as_deref(),
        }
    }
}

/// A maintainer or author entry
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Person {
    Detailed {
        #[serde(default)]
        name: String,
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
    /// `"Name <email> (url)"` shorthand
    Text(String),
}

impl Person {
    pub fn name(&self) -> &str {
        match self {
            Person::Detailed { name, .. } => name,
            Person::Text(text) => text.split('<').next().unwrap_or(text).trim(),
        }
    }
}

/// Distribution information for package tarball
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DistInfo {
    /// Tarball download URL
    #[serde(default)]
    pub tarball: String,
    /// SHA-1 checksum (legacy)
    #[serde(default)]
    pub shasum: String,
    /// Subresource integrity hash (preferred)
    #[serde(default)]
    pub integrity: Option<String>,
    /// Unpackaged size in bytes
    #[serde(rename = "unpackedSize", default)]
    pub unpacked_size: Option<u64>,
    /// File count
    #[serde(rename = "fileCount", default)]
    pub file_count: Option<u32>,
}

/// Response of `/-/v1/search`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResult {
    /// Matches in registry ranking order
    #[serde(default)]
    pub objects: Vec<SearchObject>,
    /// Total number of matches, independent of paging
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub time: Option<String>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchObject {
    pub package: SearchPackage,
    #[serde(default)]
    pub score: Option<SearchScore>,
    #[serde(rename = "searchScore", default)]
    pub search_score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchPackage {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub links: HashMap<String, String>,
    #[serde(default)]
    pub publisher: Option<Person>,
    #[serde(default)]
    pub maintainers: Vec<Person>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchScore {
    #[serde(rename = "final")]
    pub final_score: f64,
    #[serde(default)]
    pub detail: Option<SearchScoreDetail>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchScoreDetail {
    #[serde(default)]
    pub quality: f64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub maintenance: f64,
}

/// Paging for [`crate::RegistryClient::search_packages`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: u32,
    pub offset: u32,
}

impl SearchOptions {
    /// Largest page size the registry accepts
    pub const MAX_LIMIT: u32 = 250;
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
        }
    }
}

/// Response of the download statistics point endpoint
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DownloadStats {
    pub downloads: u64,
    pub start: String,
    pub end: String,
    pub package: String,
}

/// Window for download statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DownloadPeriod {
    LastDay,
    LastWeek,
    LastMonth,
}

impl DownloadPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadPeriod::LastDay => "last-day",
            DownloadPeriod::LastWeek => "last-week",
            DownloadPeriod::LastMonth => "last-month",
        }
    }
}

impl Default for DownloadPeriod {
    fn default() -> Self {
        DownloadPeriod::LastWeek
    }
}

impl fmt::Display for DownloadPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DownloadPeriod {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last-day" | "day" => Ok(DownloadPeriod::LastDay),
            "last-week" | "week" => Ok(DownloadPeriod::LastWeek),
            "last-month" | "month" => Ok(DownloadPeriod::LastMonth),
            other => Err(LensError::invalid_input(
                "period",
                format!("'{}' is not one of last-day, last-week, last-month", other),
            )),
        }
    }
}
