//! Quality scoring from registry metadata
//!
//! The score is plain arithmetic over fields the registry already returns.
//! Four components add up to at most 100:
//!
//! | component   | max | inputs                                         |
//! |-------------|-----|------------------------------------------------|
//! | metadata    | 30  | description, license, repository, docs, tags   |
//! | maintenance | 30  | days since last publish, number of releases    |
//! | popularity  | 25  | weekly downloads                               |
//! | community   | 15  | number of maintainers                          |

use chrono::{DateTime, Utc};
use pkglens_core::error::LensResult;
use pkglens_core::utils::validate_package_name;
use pkglens_registry::{DownloadPeriod, Packument, RegistryClient};
use serde::Serialize;
use tracing::debug;

use super::Report;

/// Facts about a package that feed the score
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreInputs {
    pub has_description: bool,
    pub has_license: bool,
    pub has_repository: bool,
    /// Homepage or README present
    pub has_docs: bool,
    pub keyword_count: usize,
    pub maintainer_count: usize,
    pub version_count: usize,
    pub last_publish: Option<DateTime<Utc>>,
    pub deprecated: bool,
    /// `None` when download statistics could not be fetched
    pub weekly_downloads: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub metadata: u8,
    pub maintenance: u8,
    pub popularity: u8,
    pub community: u8,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u8 {
        (self.metadata + self.maintenance + self.popularity + self.community).min(100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            Grade::Excellent
        } else if score >= 60 {
            Grade::Good
        } else if score >= 40 {
            Grade::Fair
        } else {
            Grade::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Excellent => "excellent",
            Grade::Good => "good",
            Grade::Fair => "fair",
            Grade::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub name: String,
    pub version: Option<String>,
    pub score: u8,
    pub grade: Grade,
    pub breakdown: ScoreBreakdown,
    pub weekly_downloads: Option<u64>,
    pub days_since_publish: Option<i64>,
    pub notes: Vec<String>,
}

/// Score a package; unavailable download stats lower the score but never fail it
pub async fn quality_score(client: &RegistryClient, name: &str) -> Report<QualityReport> {
    Report::from_result(collect(client, name, Utc::now()).await)
}

async fn collect(client: &RegistryClient, name: &str, now: DateTime<Utc>) -> LensResult<QualityReport> {
    validate_package_name(name)?;

    let (packument, downloads) = tokio::join!(
        client.get_package_metadata(name),
        client.get_download_stats(name, DownloadPeriod::LastWeek),
    );
    let packument = packument?;
    let weekly_downloads = match downloads {
        Ok(stats) => Some(stats.downloads),
        Err(err) => {
            debug!(package = name, error = %err, "download stats unavailable");
            None
        },
    };

    let inputs = ScoreInputs::from_packument(&packument, weekly_downloads);
    let breakdown = calculate_score(&inputs, now);
    let score = breakdown.total();

    Ok(QualityReport {
        name: packument.name.clone(),
        version: packument.latest_version().map(str::to_string),
        score,
        grade: Grade::from_score(score),
        breakdown,
        weekly_downloads,
        days_since_publish: inputs.last_publish.map(|at| days_between(at, now)),
        notes: notes(&inputs),
    })
}

impl ScoreInputs {
    pub fn from_packument(packument: &Packument, weekly_downloads: Option<u64>) -> Self {
        let latest = packument.latest();
        let non_blank = |s: Option<&String>| s.is_some_and(|s| !s.trim().is_empty());

        // Prefer the latest release date over `modified`, which also moves on unpublish
        let last_publish = packument
            .latest_version()
            .and_then(|v| packument.time.get(v))
            .map(String::as_str)
            .or_else(|| packument.modified())
            .and_then(parse_timestamp);

        Self {
            has_description: non_blank(packument.description.as_ref())
                || non_blank(latest.and_then(|v| v.description.as_ref())),
            has_license: packument.license.is_some() || latest.is_some_and(|v| v.license.is_some()),
            has_repository: packument.repository.as_ref().and_then(|r| r.url()).is_some()
                || latest.and_then(|v| v.repository.as_ref()).and_then(|r| r.url()).is_some(),
            has_docs: non_blank(packument.homepage.as_ref()) || non_blank(packument.readme.as_ref()),
            keyword_count: packument
                .keywords
                .as_ref()
                .or_else(|| latest.and_then(|v| v.keywords.as_ref()))
                .map_or(0, Vec::len),
            maintainer_count: packument.maintainers.len(),
            version_count: packument.versions.len(),
            last_publish,
            deprecated: latest.is_some_and(|v| v.deprecated.is_some()),
            weekly_downloads,
        }
    }
}

/// Compute the component scores for `inputs` as of `now`
pub fn calculate_score(inputs: &ScoreInputs, now: DateTime<Utc>) -> ScoreBreakdown {
    ScoreBreakdown {
        metadata: metadata_score(inputs),
        maintenance: maintenance_score(inputs, now),
        popularity: popularity_score(inputs.weekly_downloads),
        community: community_score(inputs.maintainer_count),
    }
}

fn metadata_score(inputs: &ScoreInputs) -> u8 {
    let mut score = 0;
    if inputs.has_description {
        score += 8;
    }
    if inputs.has_license {
        score += 8;
    }
    if inputs.has_repository {
        score += 6;
    }
    if inputs.has_docs {
        score += 4;
    }
    score + inputs.keyword_count.min(4) as u8
}

fn maintenance_score(inputs: &ScoreInputs, now: DateTime<Utc>) -> u8 {
    if inputs.deprecated {
        return 0;
    }

    let recency = match inputs.last_publish.map(|at| days_between(at, now)) {
        None => 0,
        Some(days) if days <= 30 => 20,
        Some(days) if days <= 90 => 17,
        Some(days) if days <= 180 => 14,
        Some(days) if days <= 365 => 10,
        Some(days) if days <= 730 => 5,
        Some(_) => 2,
    };

    let releases = match inputs.version_count {
        0 => 0,
        1 => 2,
        2..=4 => 5,
        5..=19 => 8,
        _ => 10,
    };

    recency + releases
}

fn popularity_score(weekly_downloads: Option<u64>) -> u8 {
    match weekly_downloads {
        None => 0,
        Some(d) if d < 100 => 2,
        Some(d) if d < 1_000 => 6,
        Some(d) if d < 10_000 => 12,
        Some(d) if d < 100_000 => 18,
        Some(d) if d < 1_000_000 => 22,
        Some(_) => 25,
    }
}

fn community_score(maintainers: usize) -> u8 {
    match maintainers {
        0 => 0,
        1 => 6,
        2..=3 => 10,
        _ => 15,
    }
}

fn notes(inputs: &ScoreInputs) -> Vec<String> {
    let mut notes = Vec::new();
    if inputs.weekly_downloads.is_none() {
        notes.push("download stats unavailable".to_string());
    }
    if inputs.deprecated {
        notes.push("latest version is deprecated".to_string());
    }
    if !inputs.has_license {
        notes.push("no license declared".to_string());
    }
    if !inputs.has_repository {
        notes.push("no repository link".to_string());
    }
    notes
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

fn days_between(earlier: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(earlier).num_days().max(0)
}
