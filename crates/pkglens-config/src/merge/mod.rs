//! Configuration layering, file discovery, and environment overrides

use std::collections::HashMap;
use camino::Utf8PathBuf;
use pkglens_core::error::LensError;
use tracing::debug;
use crate::ConfigResult;
use crate::toml::{LensToml, Settings};

/// Project configuration file name
pub const CONFIG_FILE: &str = "pkglens.toml";

/// Prefix of environment variables that override configuration
pub const ENV_PREFIX: &str = "PKGLENS_";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
    /// Directory holding the global config, `~/.pkglens` by default
    global_dir: Option<Utf8PathBuf>,
}

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Built-in defaults only
    Defaults,
    /// Global config file
    Global(Utf8PathBuf),
    /// Project pkglens.toml file
    Project(Utf8PathBuf),
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        let global_dir = dirs::home_dir()
            .and_then(|home| Utf8PathBuf::try_from(home).ok())
            .map(|home| home.join(".pkglens"));
        Self { cwd, global_dir }
    }

    /// Use `dir` instead of `~/.pkglens` for the global config
    pub fn with_global_dir(mut self, dir: Option<Utf8PathBuf>) -> Self {
        self.global_dir = dir;
        self
    }

    /// Find configuration file in project (walks up directory tree)
    pub fn find_config_path(&self, filename: &str) -> Option<Utf8PathBuf> {
        let mut current = Some(self.cwd.as_path());

        while let Some(dir) = current {
            let candidate = dir.join(filename);
            if candidate.is_file() {
                return Some(candidate);
            }
            current = dir.parent();
        }

        None
    }

    /// Load project configuration, if any
    pub async fn load_project_config(&self) -> ConfigResult<Option<(LensToml, ConfigSource)>> {
        match self.find_config_path(CONFIG_FILE) {
            Some(path) => {
                debug!(%path, "loading project config");
                let config = crate::toml::load_from_file(&path).await?;
                Ok(Some((config, ConfigSource::Project(path))))
            },
            None => Ok(None),
        }
    }

    /// Load global configuration, if any
    pub async fn load_global_config(&self) -> ConfigResult<Option<(LensToml, ConfigSource)>> {
        let Some(dir) = &self.global_dir else {
            return Ok(None);
        };

        let path = dir.join("config.toml");
        if !path.is_file() {
            return Ok(None);
        }

        debug!(%path, "loading global config");
        let config = crate::toml::load_from_file(&path).await?;
        Ok(Some((config, ConfigSource::Global(path))))
    }

    /// Load, layer and resolve every configuration source
    ///
    /// Precedence, highest first: CLI overrides, environment, project file,
    /// global file, defaults.
    pub async fn load(
        &self,
        cli_overrides: &HashMap<String, String>,
    ) -> ConfigResult<(Settings, Vec<ConfigSource>)> {
        let mut sources = Vec::new();

        let global = self.load_global_config().await?.map(|(config, source)| {
            sources.push(source);
            config
        });
        let project = self.load_project_config().await?.map(|(config, source)| {
            sources.push(source);
            config
        });
        if sources.is_empty() {
            sources.push(ConfigSource::Defaults);
        }

        let merged = ConfigLayering::merge_configs(
            global,
            project,
            &ConfigLayering::collect_env_overrides(),
            cli_overrides,
        )?;

        Ok((merged.resolve()?, sources))
    }
}

/// Configuration layering and merging
pub struct ConfigLayering;

impl ConfigLayering {
    /// Merge multiple configuration layers
    pub fn merge_configs(
        global_config: Option<LensToml>,
        project_config: Option<LensToml>,
        env_overrides: &HashMap<String, String>,
        cli_overrides: &HashMap<String, String>,
    ) -> ConfigResult<LensToml> {
        let mut merged = project_config
            .unwrap_or_default()
            .or(global_config.unwrap_or_default());

        // Apply environment variable overrides
        Self::apply_env_overrides(&mut merged, env_overrides)?;

        // Apply CLI flag overrides (highest priority)
        Self::apply_cli_overrides(&mut merged, cli_overrides)?;

        Ok(merged)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(config: &mut LensToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let field = match name {
                "REGISTRY" => "registry.url",
                "DOWNLOADS_URL" => "registry.downloads_url",
                "TIMEOUT_MS" => "registry.timeout_ms",
                "MAX_RETRIES" => "registry.max_retries",
                "BASE_DELAY_MS" => "registry.base_delay_ms",
                "MAX_CONCURRENT" => "registry.max_concurrent",
                "CACHE_CAPACITY" => "registry.cache_capacity",
                "CACHE_TTL_SECS" => "registry.cache_ttl_secs",
                "JSON" => "output.json",
                "COLOR" => "output.color",
                _ => {
                    // Unknown environment variable, ignore
                    continue;
                },
            };
            Self::set_field(config, field, value, key)?;
        }

        Ok(())
    }

    /// Apply CLI flag overrides, keyed by dotted field name
    fn apply_cli_overrides(config: &mut LensToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (field, value) in overrides {
            Self::set_field(config, field, value, field)?;
        }
        Ok(())
    }

    fn set_field(config: &mut LensToml, field: &str, value: &str, origin: &str) -> ConfigResult<()> {
        let registry = &mut config.registry;
        match field {
            "registry.url" => registry.url = Some(value.to_string()),
            "registry.downloads_url" => registry.downloads_url = Some(value.to_string()),
            "registry.timeout_ms" => registry.timeout_ms = Some(parse_value(origin, value)?),
            "registry.max_retries" => registry.max_retries = Some(parse_value(origin, value)?),
            "registry.base_delay_ms" => registry.base_delay_ms = Some(parse_value(origin, value)?),
            "registry.max_concurrent" => registry.max_concurrent = Some(parse_value(origin, value)?),
            "registry.cache_capacity" => registry.cache_capacity = Some(parse_value(origin, value)?),
            "registry.cache_ttl_secs" => registry.cache_ttl_secs = Some(parse_value(origin, value)?),
            "output.json" => config.output.json = Some(parse_bool(origin, value)?),
            "output.color" => config.output.color = Some(value.parse()?),
            other => {
                return Err(LensError::config(other, "unknown configuration field"));
            },
        }
        Ok(())
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect()
    }
}

fn parse_value<T>(origin: &str, value: &str) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| LensError::config(origin, format!("invalid value '{}': {}", value, e)))
}

fn parse_bool(origin: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(LensError::config(origin, format!("invalid boolean '{}'", value))),
    }
}
