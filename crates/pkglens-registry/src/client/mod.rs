//! Registry client: URL construction, caching, concurrency limiting and retries
//!
//! Every public read operation builds a canonical URL and funnels it through
//! the same pipeline:
//!
//! 1. cache lookup (a hit returns immediately),
//! 2. acquire a slot from the shared request limiter,
//! 3. issue the attempt under the per-attempt timeout,
//! 4. on a transient failure, back off and go to 2,
//! 5. decode, cache, and return.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use url::Url;

use pkglens_core::error::{LensError, LensResult};
use pkglens_core::utils::encode_package_name;

use crate::api::{DownloadPeriod, DownloadStats, Packument, SearchOptions, SearchResult, VersionMetadata};
use crate::cache::{CacheStats, Clock, ResponseCache, SystemClock, DEFAULT_CAPACITY, DEFAULT_TTL};
use crate::transport::{ReqwestTransport, Transport, TransportError, USER_AGENT};

mod retry;

pub use retry::RetryConfig;

/// Default npm registry
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Default host of the download statistics API
pub const DEFAULT_DOWNLOADS_URL: &str = "https://api.npmjs.org";

/// Construction-time settings for [`RegistryClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base registry URL
    pub registry_url: String,
    /// Base URL of the download statistics API
    pub downloads_url: String,
    /// Bound on each individual attempt
    pub timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
    /// Maximum number of cached responses
    pub cache_capacity: usize,
    /// Lifetime of a cached response
    pub cache_ttl: Duration,
    /// Maximum number of attempts in flight at once
    pub max_concurrent: usize,
    /// `User-Agent` header sent by the default transport
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            downloads_url: DEFAULT_DOWNLOADS_URL.to_string(),
            timeout: Duration::from_millis(10_000),
            retry: RetryConfig::default(),
            cache_capacity: DEFAULT_CAPACITY,
            cache_ttl: DEFAULT_TTL,
            max_concurrent: 10,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Check the settings that would make the client unusable
    pub fn validate(&self) -> LensResult<()> {
        for (field, value) in [
            ("registry_url", &self.registry_url),
            ("downloads_url", &self.downloads_url),
        ] {
            let url = Url::parse(value)
                .map_err(|e| LensError::config(field, format!("'{}' is not a valid URL: {}", value, e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(LensError::config(field, format!("'{}' must use http or https", value)));
            }
        }

        if self.timeout.is_zero() {
            return Err(LensError::config("timeout", "must be greater than zero"));
        }
        if self.cache_capacity == 0 {
            return Err(LensError::config("cache_capacity", "must be greater than zero"));
        }
        if self.max_concurrent == 0 {
            return Err(LensError::config("max_concurrent", "must be greater than zero"));
        }

        Ok(())
    }
}

/// Builder for [`RegistryClient`]
#[derive(Debug, Default)]
pub struct RegistryClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    clock: Option<Arc<dyn Clock>>,
}

impl RegistryClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry_url(mut self, url: impl Into<String>) -> Self {
        self.config.registry_url = url.into();
        self
    }

    pub fn downloads_url(mut self, url: impl Into<String>) -> Self {
        self.config.downloads_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    pub fn max_concurrent(mut self, max: usize) -> Self {
        self.config.max_concurrent = max;
        self
    }

    /// Ignored when a custom transport is supplied
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Replace the default `reqwest` transport
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the system clock used for cache expiry
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> LensResult<RegistryClient> {
        self.config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::with_user_agent(&self.config.user_agent)?),
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let capacity = NonZeroUsize::new(self.config.cache_capacity)
            .ok_or_else(|| LensError::config("cache_capacity", "must be greater than zero"))?;

        let mut config = self.config;
        config.registry_url = config.registry_url.trim_end_matches('/').to_string();
        config.downloads_url = config.downloads_url.trim_end_matches('/').to_string();

        Ok(RegistryClient {
            cache: Arc::new(ResponseCache::with_clock(capacity, config.cache_ttl, clock)),
            limiter: Arc::new(Semaphore::new(config.max_concurrent)),
            transport,
            config,
        })
    }
}

/// Client for npm registry read operations
///
/// Clones share the cache and the request limiter; separately built clients
/// share nothing.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    transport: Arc<dyn Transport>,
    cache: Arc<ResponseCache>,
    limiter: Arc<Semaphore>,
    config: ClientConfig,
}

/// Why a single attempt failed
#[derive(Debug)]
enum Failure {
    NotFound,
    RateLimited,
    Status(u16),
    Timeout,
    Transport(TransportError),
    Malformed(String),
}

impl Failure {
    fn is_transient(&self) -> bool {
        matches!(self, Failure::RateLimited | Failure::Timeout | Failure::Transport(_))
    }
}

impl RegistryClient {
    /// Create registry client with default configuration
    pub fn new() -> LensResult<Self> {
        Self::builder().build()
    }

    /// Create registry client with custom configuration
    pub fn with_config(config: ClientConfig) -> LensResult<Self> {
        Self::builder().config(config).build()
    }

    pub fn builder() -> RegistryClientBuilder {
        RegistryClientBuilder::default()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch the full metadata document of a package
    pub async fn get_package_metadata(&self, package_name: &str) -> LensResult<Packument> {
        require_non_empty("package name", package_name)?;
        let url = self.package_url(package_name);
        self.fetch_json(url, &format!("Package '{}'", package_name)).await
    }

    /// Fetch the metadata of one exact version of a package
    pub async fn get_package_version_metadata(
        &self,
        package_name: &str,
        version: &str,
    ) -> LensResult<VersionMetadata> {
        require_non_empty("package name", package_name)?;
        require_non_empty("version", version)?;
        let url = self.version_url(package_name, version);
        self.fetch_json(url, &format!("Version '{}@{}'", package_name, version))
            .await
    }

    /// Search the registry, preserving its ranking
    pub async fn search_packages(&self, query: &str, options: SearchOptions) -> LensResult<SearchResult> {
        require_non_empty("search query", query)?;
        if options.limit == 0 || options.limit > SearchOptions::MAX_LIMIT {
            return Err(LensError::invalid_input(
                "limit",
                format!("must be between 1 and {}", SearchOptions::MAX_LIMIT),
            ));
        }

        let url = self.search_url(query, options)?;
        self.fetch_json(url, &format!("Search results for '{}'", query))
            .await
    }

    /// Fetch download counts for a package over `period`
    pub async fn get_download_stats(
        &self,
        package_name: &str,
        period: DownloadPeriod,
    ) -> LensResult<DownloadStats> {
        require_non_empty("package name", package_name)?;
        let url = self.downloads_url(package_name, period);
        self.fetch_json(url, &format!("Download stats for '{}'", package_name))
            .await
    }

    /// Drop every cached response
    pub fn clear_cache(&self) {
        self.cache.clear();
        debug!("registry cache cleared");
    }

    /// Current number of cached responses and the cache capacity
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn package_url(&self, package_name: &str) -> String {
        format!("{}/{}", self.config.registry_url, encode_package_name(package_name))
    }

    fn version_url(&self, package_name: &str, version: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.registry_url,
            encode_package_name(package_name),
            version
        )
    }

    fn search_url(&self, query: &str, options: SearchOptions) -> LensResult<String> {
        let base = format!("{}/-/v1/search", self.config.registry_url);
        let mut url = Url::parse(&base)
            .map_err(|e| LensError::config("registry_url", format!("cannot build search URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("text", query)
            .append_pair("size", &options.limit.to_string())
            .append_pair("from", &options.offset.to_string());
        Ok(url.into())
    }

    fn downloads_url(&self, package_name: &str, period: DownloadPeriod) -> String {
        format!(
            "{}/downloads/point/{}/{}",
            self.config.downloads_url,
            period.as_str(),
            package_name
        )
    }

    /// Serve `url` from the cache or the network, decoding into `T`
    async fn fetch_json<T: DeserializeOwned>(&self, url: String, resource: &str) -> LensResult<T> {
        if let Some(value) = self.cache.get(&url) {
            debug!(%url, "cache hit");
            return decode(&url, &value);
        }

        debug!(%url, "cache miss");
        let value = self.fetch_with_retry(&url, resource).await?;
        // Only documents that decode are cached
        let document = decode(&url, &value)?;
        self.cache.insert(url, value);
        Ok(document)
    }

    /// Execute attempts with exponential backoff until success or a terminal failure
    async fn fetch_with_retry(&self, url: &str, resource: &str) -> LensResult<Arc<Value>> {
        let retry = &self.config.retry;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let failure = match self.attempt(url).await {
                Ok(value) => return Ok(value),
                Err(failure) => failure,
            };

            if !failure.is_transient() || attempt > retry.max_retries {
                return Err(self.terminal_error(failure, url, resource, attempt));
            }

            let delay = retry.backoff_delay(attempt, retry.sample_jitter());
            warn!(
                %url,
                attempt,
                max_attempts = retry.max_attempts(),
                delay_ms = delay.as_millis() as u64,
                failure = ?failure,
                "transient registry failure, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// One network attempt, holding a limiter slot only while the request is in flight
    async fn attempt(&self, url: &str) -> Result<Arc<Value>, Failure> {
        let response = {
            let _permit = self
                .limiter
                .acquire()
                .await
                .map_err(|_| Failure::Transport(TransportError::Other("request limiter closed".to_string())))?;

            match tokio::time::timeout(self.config.timeout, self.transport.get(url)).await {
                Err(_) | Ok(Err(TransportError::Timeout)) => return Err(Failure::Timeout),
                Ok(Err(err)) => return Err(Failure::Transport(err)),
                Ok(Ok(response)) => response,
            }
        };

        match response.status {
            200..=299 => serde_json::from_slice::<Value>(&response.body)
                .map(Arc::new)
                .map_err(|e| Failure::Malformed(e.to_string())),
            404 => Err(Failure::NotFound),
            429 => Err(Failure::RateLimited),
            status => Err(Failure::Status(status)),
        }
    }

    fn terminal_error(&self, failure: Failure, url: &str, resource: &str, attempts: u32) -> LensError {
        let url = url.to_string();
        match failure {
            Failure::NotFound => LensError::not_found(resource),
            Failure::RateLimited => LensError::RateLimited { url, attempts },
            Failure::Status(status) => LensError::Server { status, url },
            Failure::Timeout => LensError::Timeout {
                url,
                timeout: self.config.timeout,
            },
            Failure::Transport(err) => {
                LensError::network(format!("failed to fetch {} after {} attempts", url, attempts), err)
            },
            Failure::Malformed(message) => LensError::InvalidResponse { url, message },
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> LensResult<()> {
    if value.trim().is_empty() {
        return Err(LensError::invalid_input(field, "must not be empty"));
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(url: &str, value: &Value) -> LensResult<T> {
    T::deserialize(value).map_err(|e| LensError::InvalidResponse {
        url: url.to_string(),
        message: e.to_string(),
    })
}
