//! Install footprint estimated from tarball metadata

use pkglens_core::error::LensResult;
use pkglens_registry::RegistryClient;
use serde::Serialize;

use super::{fetch_version, Report};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
    /// The registry did not publish `dist.unpackedSize`
    Unknown,
}

impl SizeCategory {
    pub fn from_bytes(bytes: Option<u64>) -> Self {
        match bytes {
            None => SizeCategory::Unknown,
            Some(b) if b < 100 * KIB => SizeCategory::Small,
            Some(b) if b < MIB => SizeCategory::Medium,
            Some(_) => SizeCategory::Large,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeCategory::Small => "small",
            SizeCategory::Medium => "medium",
            SizeCategory::Large => "large",
            SizeCategory::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeReport {
    pub name: String,
    pub version: String,
    pub unpacked_size: Option<u64>,
    pub file_count: Option<u32>,
    pub category: SizeCategory,
    pub human_size: Option<String>,
    /// Direct dependencies, each adding its own footprint on install
    pub dependency_count: usize,
}

pub async fn package_size(client: &RegistryClient, name: &str, version: Option<&str>) -> Report<SizeReport> {
    Report::from_result(collect(client, name, version).await)
}

async fn collect(client: &RegistryClient, name: &str, version: Option<&str>) -> LensResult<SizeReport> {
    let meta = fetch_version(client, name, version).await?;
    let unpacked_size = meta.dist.unpacked_size;

    Ok(SizeReport {
        name: name.to_string(),
        version: meta.version.clone(),
        unpacked_size,
        file_count: meta.dist.file_count,
        category: SizeCategory::from_bytes(unpacked_size),
        human_size: unpacked_size.map(format_bytes),
        dependency_count: meta.dependencies.as_ref().map_or(0, |deps| deps.len()),
    })
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    }
}
