//! # pkglens
//!
//! Inspect npm packages from the command line.
//!
//! This is the main entry point for the pkglens CLI tool. It handles command
//! parsing, sets up logging and error handling, and dispatches to the
//! appropriate command handlers.

use anyhow::Context;
use clap::{Parser, Subcommand};
use pkglens_core::error::LensError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod tools;

use commands::CommandContext;
use output::colors::ColorSupport;
use output::errors::ErrorFormatter;

/// Inspect npm packages: metadata, downloads, quality, compatibility and size
#[derive(Parser)]
#[command(name = "pkglens", version, about = "Inspect npm packages from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print reports as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Registry base URL
    #[arg(long, global = true, value_name = "URL")]
    pub registry: Option<String>,

    /// When to use colors: auto, always or never
    #[arg(long, global = true, value_name = "WHEN")]
    pub color: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show an overview of a package
    Info {
        /// Package name
        package: String,
    },
    /// Show dependencies, engines and dist info of one version
    Version {
        /// Package name, optionally as name@version
        package: String,
        /// Exact version, defaults to latest
        version: Option<String>,
    },
    /// Search the registry
    Search {
        query: String,
        /// Number of results (1-250)
        #[arg(long, default_value_t = 20)]
        limit: u32,
        /// Number of results to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Show download counts
    Downloads {
        /// Package name
        package: String,
        /// last-day, last-week or last-month
        #[arg(long, default_value = "last-week")]
        period: String,
    },
    /// Compute a 0-100 quality score
    Score {
        /// Package name
        package: String,
    },
    /// Check peer dependencies and engines against a project
    Compat {
        /// Package name, optionally as name@version
        package: String,
        /// Path to the project's package.json
        #[arg(long, value_name = "PATH")]
        project: Option<PathBuf>,
        /// Node.js version to check engines.node against
        #[arg(long, value_name = "VERSION")]
        node: Option<String>,
    },
    /// Estimate install size
    Size {
        /// Package name, optionally as name@version
        package: String,
    },
}

impl Cli {
    /// Flags that override configuration, keyed by dotted field name
    fn config_overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(registry) = &self.registry {
            overrides.insert("registry.url".to_string(), registry.clone());
        }
        if let Some(color) = &self.color {
            overrides.insert("output.color".to_string(), color.clone());
        }
        if self.json {
            overrides.insert("output.json".to_string(), "true".to_string());
        }
        overrides
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    debug!("Starting pkglens v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            let formatter = ErrorFormatter::new(ColorSupport::detect());
            match err.downcast_ref::<LensError>() {
                Some(lens) => eprint!("{}", formatter.format_error(lens)),
                None => eprintln!("{}", formatter.format_simple(&format!("{:#}", err))),
            }
            ExitCode::FAILURE
        },
    }
}

fn run_cli(cli: Cli) -> anyhow::Result<bool> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

    let overrides = cli.config_overrides();
    rt.block_on(async move {
        let ctx = CommandContext::new(&overrides).await?;
        Ok::<bool, anyhow::Error>(commands::dispatch_command(cli.command, &ctx).await?)
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    // RUST_LOG takes precedence over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "pkglens={level},pkglens_core={level},pkglens_config={level},pkglens_registry={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("pkglens encountered an unexpected error: {}", panic_info);
        eprintln!("pkglens crashed! This is a bug.");
        eprintln!("Error: {}", panic_info);
    }));
}
