//! Download counts

use pkglens_core::error::LensResult;
use pkglens_core::utils::validate_package_name;
use pkglens_registry::{DownloadPeriod, RegistryClient};
use serde::Serialize;

use super::Report;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadSummary {
    pub package: String,
    pub period: DownloadPeriod,
    pub downloads: u64,
    pub start: String,
    pub end: String,
}

pub async fn downloads(client: &RegistryClient, name: &str, period: DownloadPeriod) -> Report<DownloadSummary> {
    Report::from_result(collect(client, name, period).await)
}

async fn collect(client: &RegistryClient, name: &str, period: DownloadPeriod) -> LensResult<DownloadSummary> {
    validate_package_name(name)?;
    let stats = client.get_download_stats(name, period).await?;

    Ok(DownloadSummary {
        package: stats.package,
        period,
        downloads: stats.downloads,
        start: stats.start,
        end: stats.end,
    })
}
