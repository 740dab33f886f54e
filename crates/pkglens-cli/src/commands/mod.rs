//! Command implementations and dispatch logic.
//!
//! This module contains all command handlers and the central dispatch system.
//! Each command is an async function that runs one tool against the shared
//! [`CommandContext`] and prints its report. Handlers return the report's
//! `success` flag, which becomes the process exit code.

use camino::Utf8PathBuf;
use pkglens_config::{ConfigLoader, RegistrySettings, Settings};
use pkglens_core::error::{LensError, LensResult};
use pkglens_core::PackageSpec;
use pkglens_registry::{ClientConfig, RegistryClient, RetryConfig};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

pub mod compat;
pub mod downloads;
pub mod info;
pub mod score;
pub mod search;
pub mod size;
pub mod version;

#[cfg(test)]
mod tests;

use crate::{output::OutputHandler, tools::Report, Commands};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub settings: Settings,
    pub client: RegistryClient,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Load configuration for the current directory and build the registry client
    pub async fn new(cli_overrides: &HashMap<String, String>) -> LensResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| LensError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|e| LensError::config("cwd", format!("current directory is not UTF-8: {}", e)))?;

        let (settings, sources) = ConfigLoader::new(cwd.clone()).load(cli_overrides).await?;
        debug!(?sources, "configuration loaded");

        Self::from_settings(cwd, settings)
    }

    /// Build a context from already resolved settings
    pub fn from_settings(cwd: Utf8PathBuf, settings: Settings) -> LensResult<Self> {
        let client = RegistryClient::with_config(client_config(&settings.registry))?;
        let output = OutputHandler::new(&settings.output);

        Ok(Self {
            cwd,
            settings,
            client,
            output,
        })
    }
}

/// Translate resolved registry settings into client configuration
pub fn client_config(settings: &RegistrySettings) -> ClientConfig {
    ClientConfig {
        registry_url: settings.url.clone(),
        downloads_url: settings.downloads_url.clone(),
        timeout: Duration::from_millis(settings.timeout_ms),
        retry: RetryConfig {
            max_retries: settings.max_retries,
            base_delay: Duration::from_millis(settings.base_delay_ms),
            ..RetryConfig::default()
        },
        cache_capacity: settings.cache_capacity,
        cache_ttl: Duration::from_secs(settings.cache_ttl_secs),
        max_concurrent: settings.max_concurrent,
        ..ClientConfig::default()
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> LensResult<bool> {
    debug!(registry = %ctx.settings.registry.url, json = ctx.settings.output.json, "dispatching command");

    match command {
        Commands::Info { package } => {
            info!("Looking up package: {}", package);
            Ok(info::execute(&package, ctx).await)
        },
        Commands::Version { package, version } => {
            info!("Looking up version: {} {:?}", package, version);
            Ok(version::execute(&package, version.as_deref(), ctx).await)
        },
        Commands::Search { query, limit, offset } => {
            info!("Searching registry: {} (limit: {}, offset: {})", query, limit, offset);
            Ok(search::execute(&query, limit, offset, ctx).await)
        },
        Commands::Downloads { package, period } => {
            info!("Fetching downloads: {} ({})", package, period);
            Ok(downloads::execute(&package, &period, ctx).await)
        },
        Commands::Score { package } => {
            info!("Scoring package: {}", package);
            Ok(score::execute(&package, ctx).await)
        },
        Commands::Compat { package, project, node } => {
            info!("Checking compatibility: {}", package);
            let project = match project {
                Some(path) => Utf8PathBuf::try_from(path)
                    .map_err(|e| LensError::invalid_input("project path", e.to_string()))?,
                None => ctx.cwd.join("package.json"),
            };
            Ok(compat::execute(&package, &project, node.as_deref(), ctx).await)
        },
        Commands::Size { package } => {
            info!("Estimating size: {}", package);
            Ok(size::execute(&package, ctx).await)
        },
    }
}

/// Split a `name[@version]` argument, reporting bad input as a failed report
pub(crate) fn parse_spec(input: &str, ctx: &CommandContext) -> Option<PackageSpec> {
    match input.parse::<PackageSpec>() {
        Ok(spec) => Some(spec),
        Err(err) => {
            ctx.output.emit(&Report::<()>::failed(&err), |_, _| {});
            None
        },
    }
}
