//! The fetch client: detection followed by a transfer through the fetcher
//! registered for the detected scheme.

use super::detect::DetectorRegistry;
use crate::error::{Error, Result};
use crate::utils::path::split_forced;

use async_trait::async_trait;
use reqwest::Url;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

/// Transport able to retrieve a single file for one URL scheme.
///
/// Implementations must write the exact bytes served by the source: no
/// decompression happens during transfer.
#[async_trait]
pub trait Fetcher: Debug + Send + Sync {
    /// Retrieve `url` into `dest`. The parent directory of `dest` exists.
    async fn get_file(&self, url: &Url, dest: &Path) -> Result<()>;
}

/// Resolves sources through a [`DetectorRegistry`] and dispatches the
/// transfer to a [`Fetcher`] keyed by scheme.
#[derive(Debug, Default)]
pub struct FetchClient {
    detectors: DetectorRegistry,
    fetchers: HashMap<String, Arc<dyn Fetcher>>,
}

impl FetchClient {
    /// Creates a client without any fetcher.
    pub fn new(detectors: DetectorRegistry) -> Self {
        Self {
            detectors,
            fetchers: HashMap::new(),
        }
    }

    /// Registers `fetcher` for `scheme`, replacing any previous one.
    pub fn register(&mut self, scheme: &str, fetcher: Arc<dyn Fetcher>) {
        self.fetchers.insert(scheme.to_ascii_lowercase(), fetcher);
    }

    /// Builder flavoured [`register`](Self::register).
    pub fn with_fetcher(mut self, scheme: &str, fetcher: Arc<dyn Fetcher>) -> Self {
        self.register(scheme, fetcher);
        self
    }

    /// Gets whether a fetcher is registered for `scheme`.
    pub fn supports(&self, scheme: &str) -> bool {
        self.fetchers.contains_key(&scheme.to_ascii_lowercase())
    }

    /// Gets the detector registry.
    pub fn detectors(&self) -> &DetectorRegistry {
        &self.detectors
    }

    /// Detect `source` without fetching it.
    pub fn detect(&self, source: &str, pwd: &Path) -> Result<String> {
        self.detectors.detect(source, pwd)
    }

    /// Fetch `source` into `dest`, resolving relative sources against `pwd`.
    pub async fn fetch(&self, source: &str, dest: &Path, pwd: &Path) -> Result<()> {
        let detected = self.detect(source, pwd)?;
        let (forced, rest) = split_forced(&detected);
        let url = Url::parse(rest).map_err(|e| {
            Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", rest, e))
        })?;

        let scheme = forced.unwrap_or(url.scheme()).to_ascii_lowercase();
        let fetcher = self
            .fetchers
            .get(&scheme)
            .ok_or_else(|| Error::UnsupportedScheme {
                scheme: scheme.clone(),
                url: detected.clone(),
            })?;

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| Error::Path {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        debug!(%url, %scheme, dest = %dest.display(), "fetching");
        fetcher.get_file(&url, dest).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingFetcher {
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Fetcher for RecordingFetcher {
        async fn get_file(&self, url: &Url, dest: &Path) -> Result<()> {
            self.urls.lock().unwrap().push(url.to_string());
            fs::write(dest, b"fetched").await?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_dispatch_by_forced_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Arc::new(RecordingFetcher::default());
        let client = FetchClient::new(DetectorRegistry::default()).with_fetcher("git", recorder.clone());

        let dest = dir.path().join("nested/repo");
        client
            .fetch("github.com/owner/repo", &dest, dir.path())
            .await
            .unwrap();

        assert_eq!(
            recorder.urls.lock().unwrap().as_slice(),
            ["https://github.com/owner/repo.git"]
        );
        assert_eq!(std::fs::read(&dest).unwrap(), b"fetched");
    }

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let dir = tempfile::tempdir().unwrap();
        let client = FetchClient::new(DetectorRegistry::default());
        assert!(!client.supports("https"));

        let err = client
            .fetch("https://example.com/a.bin", &dir.path().join("a.bin"), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedScheme { ref scheme, .. } if scheme == "https"));
    }

    #[tokio::test]
    async fn test_unrecognized_source() {
        let dir = tempfile::tempdir().unwrap();
        let client = FetchClient::new(DetectorRegistry::empty());

        let err = client
            .fetch("github.com/owner/repo", &dir.path().join("repo"), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnrecognizedSource(_)));
    }
}
