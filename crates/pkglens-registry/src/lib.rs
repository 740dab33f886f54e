//! npm registry access layer for pkglens
//!
//! This crate fetches package documents, search results and download
//! statistics from the npm registry. Every request goes through one pipeline
//! with an LRU/TTL response cache, a shared concurrency limit, and retries
//! with exponential backoff for rate limits, timeouts and network failures.

pub mod api;
pub mod cache;
pub mod client;
pub mod transport;

// Re-export main types
pub use api::{
    DistInfo, DownloadPeriod, DownloadStats, License, Packument, Person, RepositoryInfo,
    SearchObject, SearchOptions, SearchResult, VersionMetadata,
};
pub use cache::{CacheStats, Clock, ManualClock, ResponseCache, SystemClock};
pub use client::{ClientConfig, RegistryClient, RegistryClientBuilder, RetryConfig};
pub use transport::{ReqwestTransport, Transport, TransportError, TransportResponse};

use pkglens_core::error::LensError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, LensError>;
