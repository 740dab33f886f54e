//! Error message formatting with actionable suggestions.
//!
//! Provides user-friendly error formatting that includes context,
//! suggestions for fixes, and config file locations when available.

use pkglens_core::error::LensError;
use super::colors::ColorSupport;
use std::error::Error;

/// Error formatter with suggestions
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    /// Create a new error formatter
    pub fn new(colors: ColorSupport) -> Self {
        Self { colors }
    }

    /// Format an error with context and suggestions
    pub fn format_error(&self, error: &LensError) -> String {
        let mut output = String::new();

        // Main error message
        output.push_str(&self.colors.red("error"));
        output.push_str(": ");
        output.push_str(&error.to_string());
        output.push('\n');

        if let LensError::TomlParse { line, column, .. } = error {
            output.push_str(&self.format_location("pkglens.toml", *line, *column));
            output.push('\n');
        }

        // Add suggestion if available
        if let Some(suggestion) = error.suggestion() {
            output.push('\n');
            output.push_str(&self.colors.dim("help"));
            output.push_str(": ");
            output.push_str(suggestion);
            output.push('\n');
        }

        // Add source chain if available
        let mut source = error.source();
        while let Some(err) = source {
            output.push('\n');
            output.push_str(&self.colors.dim("caused by"));
            output.push_str(": ");
            output.push_str(&err.to_string());
            source = err.source();
        }

        output
    }

    /// Format a simple error message
    pub fn format_simple(&self, message: &str) -> String {
        format!("{}: {}", self.colors.red("error"), message)
    }

    /// Format file location context
    pub fn format_location(&self, file: &str, line: usize, column: usize) -> String {
        format!("{} {}:{}:{}", self.colors.dim("-->"), file, line, column)
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new(ColorSupport::detect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_includes_suggestion() {
        let formatter = ErrorFormatter::new(ColorSupport::disabled());
        let text = formatter.format_error(&LensError::not_found("Package 'lodahs'"));
        assert!(text.starts_with("error: Package 'lodahs' not found in registry"));
        assert!(text.contains("help: Check the package name spelling"));
    }

    #[test]
    fn test_format_toml_error_location() {
        let formatter = ErrorFormatter::new(ColorSupport::disabled());
        let text = formatter.format_error(&LensError::TomlParse {
            message: "invalid type".to_string(),
            line: 3,
            column: 14,
        });
        assert!(text.contains("--> pkglens.toml:3:14"));
    }

    #[test]
    fn test_format_source_chain() {
        let formatter = ErrorFormatter::new(ColorSupport::disabled());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let text = formatter.format_error(&LensError::io("Failed to read package.json".to_string(), io));
        assert!(text.contains("caused by: no such file"));
    }
}
