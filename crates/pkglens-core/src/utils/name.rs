//! npm package name and version validation.
//!
//! Input is checked here before any request is built so that malformed
//! identifiers never reach the network. Uppercase letters are accepted since
//! legacy packages such as `JSONStream` still resolve on the registry.

use crate::error::{LensError, LensResult};

/// Maximum length of an npm package name
pub const MAX_NAME_LENGTH: usize = 214;

/// Validate an npm package name, scoped (`@scope/name`) or unscoped
pub fn validate_package_name(name: &str) -> LensResult<()> {
    if name.trim().is_empty() {
        return Err(LensError::invalid_input("package name", "must not be empty"));
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(LensError::invalid_input(
            "package name",
            format!("'{}' is longer than {} characters", name, MAX_NAME_LENGTH),
        ));
    }

    let bare = match name.strip_prefix('@') {
        Some(scoped) => {
            let (scope, bare) = scoped.split_once('/').ok_or_else(|| {
                LensError::invalid_input(
                    "package name",
                    format!("scoped name '{}' must look like @scope/name", name),
                )
            })?;
            check_segment(name, scope)?;
            bare
        },
        None => name,
    };

    check_segment(name, bare)
}

fn check_segment(full: &str, segment: &str) -> LensResult<()> {
    if segment.is_empty() {
        return Err(LensError::invalid_input(
            "package name",
            format!("'{}' has an empty segment", full),
        ));
    }

    if segment.starts_with('.') || segment.starts_with('_') {
        return Err(LensError::invalid_input(
            "package name",
            format!("'{}' must not start with '.' or '_'", full),
        ));
    }

    let allowed = |c: char| {
        c.is_ascii_alphanumeric()
            || matches!(c, '-' | '.' | '_' | '~' | '!' | '*' | '\'' | '(' | ')')
    };
    if let Some(bad) = segment.chars().find(|c| !allowed(*c)) {
        return Err(LensError::invalid_input(
            "package name",
            format!("'{}' contains the character '{}'", full, bad),
        ));
    }

    Ok(())
}

/// Validate that `version` is an exact semantic version, not a range
pub fn validate_exact_version(version: &str) -> LensResult<semver::Version> {
    semver::Version::parse(version.trim_start_matches('v')).map_err(|e| {
        LensError::invalid_input("version", format!("'{}' is not an exact version: {}", version, e))
    })
}

/// Encode a package name for use as a registry path segment
///
/// Scoped names keep their `@` but the separator slash is escaped, which is
/// the form the registry expects: `@types/node` becomes `@types%2fnode`.
pub fn encode_package_name(name: &str) -> String {
    if name.starts_with('@') {
        name.replace('/', "%2f")
    } else {
        name.to_string()
    }
}
