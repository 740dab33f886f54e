//! pkglens.toml configuration parsing and validation

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use pkglens_core::error::LensError;
use crate::ConfigResult;

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";
pub const DEFAULT_DOWNLOADS_URL: &str = "https://api.npmjs.org";

/// Complete pkglens.toml configuration
///
/// Every field is optional so that a file only needs to name what it changes;
/// layers are merged field by field before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LensToml {
    /// Registry access settings
    #[serde(default)]
    pub registry: RegistrySection,

    /// Output settings
    #[serde(default)]
    pub output: OutputSection,
}

/// `[registry]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrySection {
    /// Base registry URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Download statistics API URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads_url: Option<String>,

    /// Per-attempt timeout in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Retries after the first attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    /// Backoff base delay in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_delay_ms: Option<u64>,

    /// Maximum requests in flight
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<usize>,

    /// Maximum number of cached responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_capacity: Option<usize>,

    /// Cached response lifetime in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_ttl_secs: Option<u64>,
}

/// `[output]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Print reports as JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,

    /// Color mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorChoice>,
}

/// When to colorize terminal output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            other => Err(LensError::config(
                "output.color",
                format!("'{}' is not one of auto, always, never", other),
            )),
        }
    }
}

/// Fully resolved settings with every default applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub registry: RegistrySettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySettings {
    pub url: String,
    pub downloads_url: String,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_concurrent: usize,
    pub cache_capacity: usize,
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSettings {
    pub json: bool,
    pub color: ColorChoice,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        RegistrySection::default().resolve()
    }
}

impl RegistrySection {
    /// Fill `self`'s unset fields from `lower`
    pub fn or(self, lower: RegistrySection) -> RegistrySection {
        RegistrySection {
            url: self.url.or(lower.url),
            downloads_url: self.downloads_url.or(lower.downloads_url),
            timeout_ms: self.timeout_ms.or(lower.timeout_ms),
            max_retries: self.max_retries.or(lower.max_retries),
            base_delay_ms: self.base_delay_ms.or(lower.base_delay_ms),
            max_concurrent: self.max_concurrent.or(lower.max_concurrent),
            cache_capacity: self.cache_capacity.or(lower.cache_capacity),
            cache_ttl_secs: self.cache_ttl_secs.or(lower.cache_ttl_secs),
        }
    }

    pub fn resolve(self) -> RegistrySettings {
        RegistrySettings {
            url: self.url.unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string()),
            downloads_url: self
                .downloads_url
                .unwrap_or_else(|| DEFAULT_DOWNLOADS_URL.to_string()),
            timeout_ms: self.timeout_ms.unwrap_or(10_000),
            max_retries: self.max_retries.unwrap_or(3),
            base_delay_ms: self.base_delay_ms.unwrap_or(1_000),
            max_concurrent: self.max_concurrent.unwrap_or(10),
            cache_capacity: self.cache_capacity.unwrap_or(500),
            cache_ttl_secs: self.cache_ttl_secs.unwrap_or(300),
        }
    }
}

impl OutputSection {
    /// Fill `self`'s unset fields from `lower`
    pub fn or(self, lower: OutputSection) -> OutputSection {
        OutputSection {
            json: self.json.or(lower.json),
            color: self.color.or(lower.color),
        }
    }

    pub fn resolve(self) -> OutputSettings {
        OutputSettings {
            json: self.json.unwrap_or(false),
            color: self.color.unwrap_or_default(),
        }
    }
}

impl LensToml {
    /// Fill `self`'s unset fields from `lower`
    pub fn or(self, lower: LensToml) -> LensToml {
        LensToml {
            registry: self.registry.or(lower.registry),
            output: self.output.or(lower.output),
        }
    }

    /// Apply defaults and validate
    pub fn resolve(self) -> ConfigResult<Settings> {
        let settings = Settings {
            registry: self.registry.resolve(),
            output: self.output.resolve(),
        };
        validate_settings(&settings)?;
        Ok(settings)
    }
}

/// Parse TOML string to LensToml configuration
pub fn parse_lens_toml(content: &str) -> ConfigResult<LensToml> {
    toml::from_str(content).map_err(|e| {
        let (line, column) = e
            .span()
            .map(|span| line_column(content, span.start))
            .unwrap_or((0, 0));
        LensError::TomlParse {
            message: e.message().to_string(),
            line,
            column,
        }
    })
}

/// Serialize LensToml to TOML string
pub fn serialize_lens_toml(config: &LensToml) -> ConfigResult<String> {
    toml::to_string_pretty(config)
        .map_err(|e| LensError::config("pkglens.toml", format!("TOML serialization error: {}", e)))
}

/// Load and parse pkglens.toml from file path
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<LensToml> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LensError::io(format!("Failed to read {}", path), e))?;

    parse_lens_toml(&content)
}

/// Validate resolved settings
pub fn validate_settings(settings: &Settings) -> ConfigResult<()> {
    let registry = &settings.registry;

    for (field, value) in [
        ("registry.url", &registry.url),
        ("registry.downloads_url", &registry.downloads_url),
    ] {
        let parsed = url::Url::parse(value)
            .map_err(|e| LensError::config(field, format!("'{}' is not a valid URL: {}", value, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(LensError::config(field, format!("'{}' must use http or https", value)));
        }
    }

    for (field, value) in [
        ("registry.timeout_ms", registry.timeout_ms),
        ("registry.max_concurrent", registry.max_concurrent as u64),
        ("registry.cache_capacity", registry.cache_capacity as u64),
        ("registry.cache_ttl_secs", registry.cache_ttl_secs),
    ] {
        if value == 0 {
            return Err(LensError::config(field, "must be greater than zero"));
        }
    }

    if registry.max_retries > 10 {
        return Err(LensError::config("registry.max_retries", "must be at most 10"));
    }

    Ok(())
}

/// 1-based line and column of a byte offset
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let column = before.rfind('\n').map(|nl| before.len() - nl).unwrap_or(before.len() + 1);
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_file_uses_defaults() {
        let config = parse_lens_toml("").unwrap();
        assert_eq!(config, LensToml::default());

        let settings = config.resolve().unwrap();
        assert_eq!(settings.registry.url, DEFAULT_REGISTRY_URL);
        assert_eq!(settings.registry.downloads_url, DEFAULT_DOWNLOADS_URL);
        assert_eq!(settings.registry.timeout_ms, 10_000);
        assert_eq!(settings.registry.max_retries, 3);
        assert_eq!(settings.registry.max_concurrent, 10);
        assert_eq!(settings.registry.cache_ttl_secs, 300);
        assert!(!settings.output.json);
        assert_eq!(settings.output.color, ColorChoice::Auto);
    }

    #[test]
    fn test_parse_full_file() {
        let content = r#"
[registry]
url = "https://npm.example.com"
timeout_ms = 2500
max_retries = 5
cache_capacity = 50

[output]
json = true
color = "never"
"#;
        let settings = parse_lens_toml(content).unwrap().resolve().unwrap();
        assert_eq!(settings.registry.url, "https://npm.example.com");
        assert_eq!(settings.registry.timeout_ms, 2500);
        assert_eq!(settings.registry.max_retries, 5);
        assert_eq!(settings.registry.cache_capacity, 50);
        assert_eq!(settings.registry.base_delay_ms, 1_000);
        assert!(settings.output.json);
        assert_eq!(settings.output.color, ColorChoice::Never);
    }

    #[test]
    fn test_parse_error_location() {
        let content = "[registry]\ntimeout_ms = \"soon\"\n";
        match parse_lens_toml(content).unwrap_err() {
            LensError::TomlParse { line, column, .. } => {
                assert_eq!(line, 2);
                assert!(column > 1);
            },
            other => panic!("Expected TomlParse error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(parse_lens_toml("[registry]\nurll = \"x\"\n").is_err());
        assert!(parse_lens_toml("[telemetry]\nenabled = true\n").is_err());
    }

    #[test]
    fn test_validation() {
        let bad_url = LensToml {
            registry: RegistrySection {
                url: Some("registry.npmjs.org".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(bad_url.resolve().is_err());

        let zero_timeout = LensToml {
            registry: RegistrySection {
                timeout_ms: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(zero_timeout.resolve().is_err());
    }

    #[test]
    fn test_section_or_prefers_self() {
        let high = RegistrySection {
            timeout_ms: Some(1),
            ..Default::default()
        };
        let low = RegistrySection {
            timeout_ms: Some(2),
            max_retries: Some(7),
            ..Default::default()
        };
        let merged = high.or(low);
        assert_eq!(merged.timeout_ms, Some(1));
        assert_eq!(merged.max_retries, Some(7));
    }

    #[test]
    fn test_serialize_roundtrip_skips_unset() {
        let config = LensToml {
            registry: RegistrySection {
                url: Some("https://npm.example.com".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let text = serialize_lens_toml(&config).unwrap();
        assert!(text.contains("url = \"https://npm.example.com\""));
        assert!(!text.contains("timeout_ms"));
    }

    #[test]
    fn test_line_column() {
        assert_eq!(line_column("abc", 0), (1, 1));
        assert_eq!(line_column("abc\ndef", 5), (2, 2));
    }
}
