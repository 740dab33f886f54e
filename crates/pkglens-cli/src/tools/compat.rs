//! Peer dependency and engine compatibility against a local project

use pkglens_config::PackageJson;
use pkglens_core::error::LensResult;
use pkglens_registry::RegistryClient;
use semver::{Version, VersionReq};
use serde::Serialize;

use super::{fetch_version, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Compatible,
    Incompatible,
    Unknown,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Compatible => "compatible",
            Verdict::Incompatible => "incompatible",
            Verdict::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Satisfied,
    Unsatisfied,
    /// Required peer the project does not declare
    Missing,
    /// Optional peer the project does not declare
    Skipped,
    /// Range or declared version could not be interpreted
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatCheck {
    /// Peer dependency name, or `node` for the engine check
    pub name: String,
    pub required: String,
    pub found: Option<String>,
    pub status: CheckStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatReport {
    pub name: String,
    pub version: String,
    pub verdict: Verdict,
    pub peers: Vec<CompatCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<CompatCheck>,
}

/// Check `name@version` (latest when `None`) against `project`
///
/// `node` overrides the Node.js version taken from the project's
/// `engines.node`.
pub async fn check_compat(
    client: &RegistryClient,
    name: &str,
    version: Option<&str>,
    project: &PackageJson,
    node: Option<&str>,
) -> Report<CompatReport> {
    Report::from_result(collect(client, name, version, project, node).await)
}

async fn collect(
    client: &RegistryClient,
    name: &str,
    version: Option<&str>,
    project: &PackageJson,
    node: Option<&str>,
) -> LensResult<CompatReport> {
    let meta = fetch_version(client, name, version).await?;

    let mut peers: Vec<CompatCheck> = meta
        .peer_dependencies
        .iter()
        .flatten()
        .map(|(peer, required)| {
            check_peer(peer, required, project.declared_range(peer), meta.is_optional_peer(peer))
        })
        .collect();
    peers.sort_by(|a, b| a.name.cmp(&b.name));

    let node = node
        .map(str::to_string)
        .or_else(|| project.engines.get("node").cloned());
    let engine = meta
        .engines
        .as_ref()
        .and_then(|engines| engines.get("node"))
        .zip(node)
        .map(|(required, found)| check_engine(required, &found));

    Ok(CompatReport {
        name: name.to_string(),
        version: meta.version.clone(),
        verdict: verdict(peers.iter().chain(engine.as_ref())),
        peers,
        engine,
    })
}

pub fn check_peer(name: &str, required: &str, declared: Option<&str>, optional: bool) -> CompatCheck {
    let status = match declared {
        None if optional => CheckStatus::Skipped,
        None => CheckStatus::Missing,
        Some(declared) => match (parse_range(required), minimum_version(declared)) {
            (Some(reqs), Some(found)) => satisfied(&reqs, &found),
            _ => CheckStatus::Unknown,
        },
    };

    CompatCheck {
        name: name.to_string(),
        required: required.to_string(),
        found: declared.map(str::to_string),
        status,
    }
}

pub fn check_engine(required: &str, node: &str) -> CompatCheck {
    let status = match (parse_range(required), minimum_version(node)) {
        (Some(reqs), Some(found)) => satisfied(&reqs, &found),
        _ => CheckStatus::Unknown,
    };

    CompatCheck {
        name: "node".to_string(),
        required: required.to_string(),
        found: Some(node.to_string()),
        status,
    }
}

/// Any unsatisfied check is incompatible; otherwise any open question is unknown
pub fn verdict<'a>(checks: impl IntoIterator<Item = &'a CompatCheck>) -> Verdict {
    let mut result = Verdict::Compatible;
    for check in checks {
        match check.status {
            CheckStatus::Unsatisfied => return Verdict::Incompatible,
            CheckStatus::Missing | CheckStatus::Unknown => result = Verdict::Unknown,
            CheckStatus::Satisfied | CheckStatus::Skipped => {},
        }
    }
    result
}

fn satisfied(reqs: &[VersionReq], version: &Version) -> CheckStatus {
    if reqs.iter().any(|req| req.matches(version)) {
        CheckStatus::Satisfied
    } else {
        CheckStatus::Unsatisfied
    }
}

/// Parse an npm range into its `||` alternatives
///
/// npm separates comparators with spaces and allows `a - b` hyphen ranges;
/// both are rewritten into the comma-separated form `semver` accepts.
pub fn parse_range(range: &str) -> Option<Vec<VersionReq>> {
    range
        .split("||")
        .map(|alternative| {
            let alternative = alternative.trim();
            let normalized = match alternative.split_once(" - ") {
                Some((low, high)) => format!(">={}, <={}", low.trim(), high.trim()),
                None => join_comparators(alternative),
            };
            if normalized.is_empty() {
                return VersionReq::parse("*").ok();
            }
            VersionReq::parse(&normalized).ok()
        })
        .collect()
}

fn join_comparators(alternative: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut pending = String::new();
    for token in alternative.split_whitespace() {
        if token.chars().all(|c| matches!(c, '<' | '>' | '=' | '~' | '^')) {
            // Operator separated from its version, as in `>= 1.2.0`
            pending.push_str(token);
            continue;
        }
        let comparator = format!("{}{}", std::mem::take(&mut pending), token);
        parts.push(pin_bare_version(comparator));
    }
    parts.join(", ")
}

/// A full `x.y.z` without an operator is an exact pin in npm, not a caret range
fn pin_bare_version(comparator: String) -> String {
    let bare = comparator.trim_start_matches('v');
    if !comparator.starts_with(['<', '>', '=', '~', '^']) && Version::parse(bare).is_ok() {
        format!("={}", bare)
    } else {
        comparator
    }
}

/// Lowest concrete version a declared range or version string admits
///
/// Returns `None` for ranges without a lower bound and for non-registry
/// specifiers such as `file:`, `git+` or `workspace:` ones.
pub fn minimum_version(declared: &str) -> Option<Version> {
    let first = declared.split("||").next()?.trim();
    let first = first.split_whitespace().next().unwrap_or(first);
    if first.starts_with('<') || first.contains(':') || first.contains('/') {
        return None;
    }

    let bare = first
        .trim_start_matches(['^', '~', '>', '=', 'v'])
        .trim();
    if let Ok(version) = Version::parse(bare) {
        return Some(version);
    }

    // Partial versions such as `18`, `4.17` or `1.x`
    let mut numbers = bare
        .split('.')
        .map_while(|part| part.parse::<u64>().ok());
    let major = numbers.next()?;
    Some(Version::new(major, numbers.next().unwrap_or(0), numbers.next().unwrap_or(0)))
}
