//! Core downloader implementation.
//!
//! # Examples
//!
//! ```rust,no_run
//! use downloadmanager::downloader::DownloaderBuilder;
//! use downloadmanager::DownloadOptions;
//!
//! # async fn example() -> downloadmanager::Result<()> {
//! let downloader = DownloaderBuilder::new().build()?;
//!
//! let options = DownloadOptions::new().md5_sum("5eb63bbbe01eeed093cb22bb8f5acdc3");
//! let downloaded = downloader
//!     .download_file("https://example.com/synset.txt", "/var/models/synset.txt", &options)
//!     .await?;
//! println!("{} (fresh: {})", downloaded.path.display(), downloaded.did_download);
//!
//! let archive = downloader
//!     .download_into("https://example.com/resnet.tar.gz", "/var/models/resnet", &DownloadOptions::new())
//!     .await?;
//! println!("unpacked next to {}", archive.display());
//! # Ok(())
//! # }
//! ```

use super::inflight::InFlight;
use crate::archive;
use crate::cache::{Cache, CacheKey, Expiration};
use crate::download::{verify_hash, DownloadOptions};
use crate::error::{Error, Result};
use crate::fetch::FetchClient;
use crate::utils::path::{file_name_from_url, sanitize_dir};

use std::fmt;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, warn};

/// Outcome of a successful [`Downloader::download_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downloaded {
    /// Absolute path of the file on disk.
    pub path: PathBuf,
    /// `false` when the file came from the cache or was already valid on disk.
    pub did_download: bool,
}

/// Represents the download controller.
///
/// Clones share the cache, the fetch client and the in-flight map.
#[derive(Clone)]
pub struct Downloader {
    cache: Arc<Cache>,
    fetch: Arc<FetchClient>,
    in_flight: Arc<InFlight>,
}

impl Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("cache", &self.cache)
            .field("fetch", &self.fetch)
            .finish_non_exhaustive()
    }
}

impl Downloader {
    /// Creates a new Downloader around its collaborators.
    pub(crate) fn new(cache: Arc<Cache>, fetch: FetchClient) -> Self {
        Self {
            cache,
            fetch: Arc::new(fetch),
            in_flight: Arc::new(InFlight::default()),
        }
    }

    /// Gets the cache used to skip redundant downloads.
    pub fn cache(&self) -> &Arc<Cache> {
        &self.cache
    }

    /// Gets the client resolving and transferring sources.
    pub fn fetch_client(&self) -> &FetchClient {
        &self.fetch
    }

    /// Download `url` into the file `target`.
    ///
    /// The parent directory of `target` is sanitized (spaces and colons become
    /// `_`) and created owner-only. A file already present at the resolved
    /// path is reused when checksum checking is off or when it matches the
    /// expected checksum; otherwise it is deleted and fetched again.
    pub async fn download_file(
        &self,
        url: &str,
        target: impl AsRef<Path>,
        options: &DownloadOptions,
    ) -> Result<Downloaded> {
        let target = target.as_ref();
        if url.trim().is_empty() {
            return Err(Error::InvalidInput("invalid empty url".into()));
        }

        let key = CacheKey::new(url, target).to_string();
        let _guard = self.in_flight.acquire(&key).await;

        if options.cache_enabled() {
            if let Some(path) = self.cache.get(&key).filter(|path| path.is_file()) {
                debug!(url, path = %path.display(), "cache hit");
                return Ok(Downloaded {
                    path,
                    did_download: false,
                });
            }
        }

        let file_name = target.file_name().ok_or_else(|| {
            Error::InvalidInput(format!("{} does not name a file", target.display()))
        })?;
        let dir = resolve_dir(target.parent().unwrap_or_else(|| Path::new("")))?;
        let path = dir.join(file_name);

        self.fetch
            .detect(url, &dir)
            .map_err(|source| Error::UnresolvedUrl {
                url: url.to_owned(),
                source: Box::new(source),
            })?;

        create_dir(&dir).await?;

        if is_file(&path).await? {
            if !options.check_md5_sum_enabled() {
                debug!(path = %path.display(), "reusing existing file");
                self.remember(&key, &path, options);
                return Ok(Downloaded {
                    path,
                    did_download: false,
                });
            }

            match options.expected_md5_sum() {
                Some(expected) => match verify(&path, expected).await {
                    Ok(true) => {
                        debug!(path = %path.display(), "existing file matches checksum");
                        self.remember(&key, &path, options);
                        return Ok(Downloaded {
                            path,
                            did_download: false,
                        });
                    }
                    Ok(false) => debug!(path = %path.display(), "checksum mismatch, fetching again"),
                    Err(e) => warn!(path = %path.display(), "unable to verify existing file: {}", e),
                },
                None => debug!(path = %path.display(), "no checksum to validate against, fetching again"),
            }
            remove(&path).await?;
        }

        debug!(url, target = %path.display(), "downloading data");
        self.fetch.fetch(url, &path, &dir).await?;

        if let Some(expected) = options.checksum_to_verify() {
            let valid = match verify(&path, expected).await {
                Ok(valid) => valid,
                Err(e) => {
                    let _ = remove(&path).await;
                    return Err(e);
                }
            };
            if !valid {
                remove(&path).await?;
                return Err(Error::ChecksumMismatch {
                    path,
                    expected: expected.to_owned(),
                });
            }
        }

        self.remember(&key, &path, options);
        Ok(Downloaded {
            path,
            did_download: true,
        })
    }

    /// Download `url` into the directory `target_dir` and extract it there.
    ///
    /// The file is named after the basename of the URL path. Archives are only
    /// extracted when actually downloaded; their content lands next to the
    /// archive, which is kept. Returns the path of the downloaded file.
    pub async fn download_into(
        &self,
        url: &str,
        target_dir: impl AsRef<Path>,
        options: &DownloadOptions,
    ) -> Result<PathBuf> {
        let target_dir = target_dir.as_ref();
        self.download_into_inner(url, target_dir, options)
            .await
            .map_err(|source| Error::Download {
                url: url.to_owned(),
                path: target_dir.to_path_buf(),
                source: Box::new(source),
            })
    }

    async fn download_into_inner(
        &self,
        url: &str,
        target_dir: &Path,
        options: &DownloadOptions,
    ) -> Result<PathBuf> {
        if url.trim().is_empty() {
            return Err(Error::InvalidInput("invalid empty url".into()));
        }

        let dir = resolve_dir(target_dir)?;
        create_dir(&dir).await?;

        let file_name = file_name_from_url(url)
            .ok_or_else(|| Error::InvalidUrl(format!("Unable to derive a file name from {}", url)))?;
        let target = dir.join(file_name);

        let _guard = self
            .in_flight
            .acquire(&format!("into:{}:{}", url, dir.display()))
            .await;

        let downloaded = self.download_file(url, &target, options).await?;
        if downloaded.did_download {
            let (dir, path) = (dir.clone(), downloaded.path.clone());
            tokio::task::spawn_blocking(move || archive::extract(&dir, &path))
                .await
                .map_err(|e| Error::Internal(format!("Extraction task failed: {}", e)))??;
        }

        self.remember(
            &CacheKey::new(url, &downloaded.path).to_string(),
            &downloaded.path,
            options,
        );
        Ok(downloaded.path)
    }

    fn remember(&self, key: &str, path: &Path, options: &DownloadOptions) {
        if options.cache_enabled() {
            self.cache.set(key, path, Expiration::Default);
        }
    }
}

fn resolve_dir(dir: &Path) -> Result<PathBuf> {
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    Ok(std::path::absolute(sanitize_dir(dir))?)
}

async fn create_dir(dir: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o700);
    builder
        .create(dir)
        .await
        .map_err(|source| Error::DirectoryCreationFailed {
            path: dir.to_path_buf(),
            source,
        })
}

/// Only regular files count: a directory at the target is never a download.
async fn is_file(path: &Path) -> Result<bool> {
    match fs::metadata(path).await {
        Ok(metadata) => Ok(metadata.is_file()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

async fn remove(path: &Path) -> Result<()> {
    fs::remove_file(path).await.map_err(|source| Error::Path {
        path: path.to_path_buf(),
        source,
    })
}

async fn verify(path: &Path, expected: &str) -> Result<bool> {
    let (path, expected) = (path.to_path_buf(), expected.to_owned());
    let valid = tokio::task::spawn_blocking(move || verify_hash(&path, &expected))
        .await
        .map_err(|e| Error::Internal(format!("Checksum task failed: {}", e)))??;
    Ok(valid)
}
