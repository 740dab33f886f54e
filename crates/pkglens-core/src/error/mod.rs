//! Error types and result aliases for pkglens operations.
//!
//! Provides a unified error type covering registry access, input validation
//! and configuration, with a coarse [`ErrorKind`] taxonomy that callers can
//! match on without caring about the payload of each variant.

use std::time::Duration;
use thiserror::Error;

/// Unified error type for all pkglens operations
#[derive(Error, Debug)]
pub enum LensError {
    // Registry errors
    #[error("{resource} not found in registry")]
    NotFound { resource: String },

    #[error("Rate limited by registry after {attempts} attempts: {url}")]
    RateLimited { url: String, attempts: u32 },

    #[error("Registry returned status {status} for {url}")]
    Server { status: u16, url: String },

    #[error("Request timed out after {}ms: {url}", .timeout.as_millis())]
    Timeout { url: String, timeout: Duration },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Malformed registry response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    // Input errors
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    // Config errors
    #[error("Failed to parse pkglens.toml: {message} at line {line}, column {column}")]
    TomlParse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for pkglens operations
pub type LensResult<T> = Result<T, LensError>;

/// Coarse classification of a [`LensError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    RateLimited,
    ServerError,
    Timeout,
    NetworkError,
    InvalidResponse,
    InvalidInput,
    Config,
    Io,
}

impl LensError {
    /// Create a not-found error for a package or package version
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create a network error without an underlying source
    pub fn network_msg(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create an input validation error
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration validation error
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LensError::NotFound { .. } => ErrorKind::NotFound,
            LensError::RateLimited { .. } => ErrorKind::RateLimited,
            LensError::Server { .. } => ErrorKind::ServerError,
            LensError::Timeout { .. } => ErrorKind::Timeout,
            LensError::Network { .. } => ErrorKind::NetworkError,
            LensError::InvalidResponse { .. } => ErrorKind::InvalidResponse,
            LensError::InvalidInput { .. } => ErrorKind::InvalidInput,
            LensError::TomlParse { .. } | LensError::ConfigValidation { .. } => ErrorKind::Config,
            LensError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Check if retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RateLimited | ErrorKind::Timeout | ErrorKind::NetworkError
        )
    }

    /// Check if this error means the requested package or version does not exist
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            LensError::NotFound { .. } => {
                Some("Check the package name spelling or try 'pkglens search'")
            },
            LensError::RateLimited { .. } => {
                Some("The registry is throttling requests; wait a minute and try again")
            },
            LensError::Timeout { .. } => {
                Some("Increase registry.timeout_ms in pkglens.toml or PKGLENS_TIMEOUT_MS")
            },
            LensError::Network { .. } => Some("Check your internet connection and try again"),
            LensError::InvalidInput { .. } => {
                Some("Package names use URL-safe characters and may be scoped, e.g. @scope/name")
            },
            LensError::TomlParse { .. } | LensError::ConfigValidation { .. } => {
                Some("Fix pkglens.toml or the PKGLENS_* environment variables")
            },
            _ => None,
        }
    }
}
