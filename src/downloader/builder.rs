//! Builder pattern implementation for creating Downloader instances.
//!
//! # Examples
//!
//! ```rust
//! use downloadmanager::downloader::DownloaderBuilder;
//! use downloadmanager::Cache;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # fn example() -> downloadmanager::Result<()> {
//! let cache = Arc::new(Cache::new(Duration::from_secs(600)));
//!
//! let downloader = DownloaderBuilder::new()
//!     .app_name("model-server/2.1")
//!     .retries(5)
//!     .timeout(Duration::from_secs(120))
//!     .cache(cache.clone())
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use super::{config::DownloaderConfig, downloader::Downloader};
use crate::cache::Cache;
use crate::error::Result;
use crate::fetch::{Detector, DetectorRegistry, FetchClient, Fetcher, FileFetcher, HttpFetcher};
use crate::http::{create_http_client, HttpClientConfig};
use crate::progress::ProgressBarOpts;

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use std::sync::Arc;
use std::time::Duration;

/// A builder used to create a [`Downloader`].
///
/// ```rust
/// # fn main() -> downloadmanager::Result<()> {
/// use downloadmanager::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().retries(5).build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct DownloaderBuilder {
    config: DownloaderConfig,
}

impl DownloaderBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloaderBuilder::default()
    }

    /// Set the time to live of cache entries.
    ///
    /// Ignored when a cache is injected through [`cache()`](Self::cache).
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    /// Share `cache` with this downloader.
    pub fn cache(mut self, cache: Arc<Cache>) -> Self {
        self.config.cache = Some(cache);
        self
    }

    /// Set the number of retries per HTTP request.
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Route HTTP requests through `proxy`.
    pub fn proxy(mut self, proxy: reqwest::Proxy) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Identify the embedding application in the `User-Agent` header.
    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.config.app_name = Some(app_name.into());
        self
    }

    /// Set the total timeout of a single HTTP request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the progress bar options. Bars are hidden by default.
    pub fn progress(mut self, progress: ProgressBarOpts) -> Self {
        self.config.progress = progress;
        self
    }

    /// Replace the detector registry.
    pub fn detectors(mut self, detectors: DetectorRegistry) -> Self {
        self.config.detectors = detectors;
        self
    }

    /// Add a detector consulted before the built-in ones.
    pub fn detector(mut self, detector: Box<dyn Detector>) -> Self {
        self.config.detectors.push_front(detector);
        self
    }

    /// Register a fetcher for `scheme`, replacing a built-in one if any.
    ///
    /// ```rust
    /// # fn main() -> downloadmanager::Result<()> {
    /// use downloadmanager::downloader::DownloaderBuilder;
    /// use downloadmanager::fetch::FileFetcher;
    /// use std::sync::Arc;
    ///
    /// let d = DownloaderBuilder::new()
    ///     .fetcher("local", Arc::new(FileFetcher))
    ///     .build()?;
    /// assert!(d.fetch_client().supports("local"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn fetcher(mut self, scheme: impl Into<String>, fetcher: Arc<dyn Fetcher>) -> Self {
        self.config.fetchers.push((scheme.into(), fetcher));
        self
    }

    /// Helper method to get or create a new HeaderMap.
    fn new_header(&self) -> HeaderMap {
        match self.config.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Add the http headers.
    ///
    /// You can call `.headers()` multiple times and all `HeaderMap` will be merged into a single one.
    ///
    /// See also [`header()`].
    ///
    /// [`header()`]: DownloaderBuilder::header
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.headers = Some(new);
        self
    }

    /// Add the http header
    ///
    /// # Example
    ///
    /// ```
    /// use reqwest::header::{self, HeaderValue};
    /// use downloadmanager::downloader::DownloaderBuilder;
    ///
    /// let auth = HeaderValue::from_static("Bearer hf_token");
    ///
    /// let builder = DownloaderBuilder::new()
    ///     .header(header::AUTHORIZATION, auth)
    ///     .build();
    /// ```
    ///
    /// See also [`headers()`].
    ///
    /// [`headers()`]: DownloaderBuilder::headers
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();

        new.insert(name, value);

        self.config.headers = Some(new);
        self
    }

    /// Create the [`Downloader`] with the specified options.
    ///
    /// Fails if the HTTP client cannot be built, e.g. when no TLS backend is
    /// available.
    pub fn build(self) -> Result<Downloader> {
        let DownloaderConfig {
            cache_ttl,
            cache,
            retries,
            headers,
            proxy,
            app_name,
            timeout,
            progress,
            detectors,
            fetchers,
        } = self.config;

        let client = create_http_client(HttpClientConfig {
            retries,
            proxy,
            headers,
            user_agent: app_name,
            timeout,
        })?;
        let http: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(client, progress));

        let mut fetch = FetchClient::new(detectors)
            .with_fetcher("http", http.clone())
            .with_fetcher("https", http)
            .with_fetcher("file", Arc::new(FileFetcher));
        for (scheme, fetcher) in fetchers {
            fetch.register(&scheme, fetcher);
        }

        let cache = cache.unwrap_or_else(|| Arc::new(Cache::new(cache_ttl)));
        Ok(Downloader::new(cache, fetch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{ACCEPT, AUTHORIZATION};

    #[test]
    fn test_headers_are_merged() {
        let mut extra = HeaderMap::new();
        extra.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let builder = DownloaderBuilder::new()
            .header(AUTHORIZATION, HeaderValue::from_static("Bearer x"))
            .headers(extra);

        let headers = builder.config.headers.as_ref().unwrap();
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_build_registers_builtin_fetchers() {
        let downloader = DownloaderBuilder::new().build().unwrap();
        let client = downloader.fetch_client();
        assert!(client.supports("http"));
        assert!(client.supports("https"));
        assert!(client.supports("file"));
        assert!(!client.supports("git"));
        assert_eq!(downloader.cache().default_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_build_uses_injected_cache() {
        let cache = Arc::new(Cache::new(Duration::from_secs(1)));
        let downloader = DownloaderBuilder::new()
            .cache_ttl(Duration::from_secs(900))
            .cache(cache.clone())
            .build()
            .unwrap();
        assert!(Arc::ptr_eq(downloader.cache(), &cache));
    }

    #[test]
    fn test_cache_ttl() {
        let downloader = DownloaderBuilder::new()
            .cache_ttl(Duration::from_secs(900))
            .build()
            .unwrap();
        assert_eq!(downloader.cache().default_ttl(), Duration::from_secs(900));
    }
}
