//! Terminal output formatting and utilities.
//!
//! This module provides consistent output formatting across all commands,
//! in human-readable form or as one JSON document per report.

pub mod colors;
pub mod errors;

use pkglens_config::OutputSettings;
use serde::Serialize;

use crate::tools::Report;
use colors::ColorSupport;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: ColorSupport,
    json: bool,
}

impl OutputHandler {
    /// Create a new output handler
    pub fn new(settings: &OutputSettings) -> Self {
        Self {
            colors: ColorSupport::from_choice(settings.color),
            json: settings.json,
        }
    }

    pub fn colors(&self) -> &ColorSupport {
        &self.colors
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        println!("{}", self.colors.dim(message));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", self.colors.green("✓"), message);
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        println!("{} {}", self.colors.yellow("⚠"), message);
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", self.colors.red("✗"), message);
    }

    /// Print a heading line
    pub fn title(&self, title: &str, detail: &str) {
        println!("{} {}", self.colors.bold(title), self.colors.dim(detail));
    }

    /// Print an aligned `label: value` line, skipping absent values
    pub fn field(&self, label: &str, value: Option<&str>) {
        if let Some(value) = value {
            println!("  {:<14} {}", self.colors.cyan(label), value);
        }
    }

    /// Print a report and return its `success` flag
    ///
    /// Failed reports print their error and suggestion; successful ones are
    /// handed to `render` unless JSON output is enabled.
    pub fn emit<T, F>(&self, report: &Report<T>, render: F) -> bool
    where
        T: Serialize,
        F: FnOnce(&Self, &T),
    {
        if self.json {
            match serde_json::to_string_pretty(report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    self.error(&format!("failed to serialize report: {}", e));
                    return false;
                },
            }
            return report.success;
        }

        match &report.data {
            Some(data) if report.success => render(self, data),
            _ => {
                self.error(report.error.as_deref().unwrap_or("unknown error"));
                if let Some(suggestion) = &report.suggestion {
                    eprintln!("{}: {}", self.colors.dim("help"), suggestion);
                }
            },
        }
        report.success
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new(&OutputSettings::default())
    }
}
