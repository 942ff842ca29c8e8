//! Configuration structures and defaults for the downloader.

use crate::cache::{Cache, DEFAULT_TTL};
use crate::fetch::{DetectorRegistry, Fetcher};
use crate::progress::ProgressBarOpts;

use reqwest::header::HeaderMap;
use std::sync::Arc;
use std::time::Duration;

/// Configuration structure for the downloader
pub struct DownloaderConfig {
    /// Time to live of cache entries, used when no cache is injected.
    pub cache_ttl: Duration,
    /// Cache shared with other downloaders. A private one is created otherwise.
    pub cache: Option<Arc<Cache>>,
    /// Number of retries per HTTP request.
    pub retries: u32,
    /// Custom HTTP headers.
    pub headers: Option<HeaderMap>,
    /// Optional proxy configuration.
    pub proxy: Option<reqwest::Proxy>,
    /// Name of the embedding application, sent as `User-Agent`.
    pub app_name: Option<String>,
    /// Total timeout of a single HTTP request.
    pub timeout: Option<Duration>,
    /// Progress bar shown during HTTP transfers.
    pub progress: ProgressBarOpts,
    /// Detectors used to resolve source strings.
    pub detectors: DetectorRegistry,
    /// Extra fetchers, registered after the built-in ones.
    pub fetchers: Vec<(String, Arc<dyn Fetcher>)>,
}

impl std::fmt::Debug for DownloaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloaderConfig")
            .field("cache_ttl", &self.cache_ttl)
            .field("cache", &self.cache.is_some())
            .field("retries", &self.retries)
            .field("headers", &self.headers)
            .field("proxy", &self.proxy)
            .field("app_name", &self.app_name)
            .field("timeout", &self.timeout)
            .field("progress", &self.progress)
            .field("detectors", &self.detectors.len())
            .field(
                "fetchers",
                &self.fetchers.iter().map(|(s, _)| s.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_TTL,
            cache: None,
            retries: 3,
            headers: None,
            proxy: None,
            app_name: None,
            timeout: None,
            progress: ProgressBarOpts::hidden(),
            detectors: DetectorRegistry::default(),
            fetchers: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DownloaderConfig::default();
        assert_eq!(config.cache_ttl, Duration::from_secs(5 * 60));
        assert_eq!(config.retries, 3);
        assert!(config.cache.is_none());
        assert!(!config.progress.is_enabled());
        assert_eq!(config.detectors.len(), 6);
        assert!(config.fetchers.is_empty());
    }
}
