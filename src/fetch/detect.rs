//! Source detection.
//!
//! A [`Detector`] recognises one shorthand or protocol form of a source string
//! and rewrites it into a canonical URL, optionally prefixed by a forced
//! fetcher (`git::https://...`). The [`DetectorRegistry`] tries its detectors
//! in order; sources that already are absolute URLs are returned unchanged.
//!
//! ```rust
//! use std::path::Path;
//! use downloadmanager::fetch::DetectorRegistry;
//!
//! let registry = DetectorRegistry::default();
//! assert_eq!(
//!     registry.detect("github.com/owner/repo", Path::new("/tmp")).unwrap(),
//!     "git::https://github.com/owner/repo.git"
//! );
//! assert_eq!(
//!     registry.detect("https://example.com/a.zip", Path::new("/tmp")).unwrap(),
//!     "https://example.com/a.zip"
//! );
//! ```

use crate::error::{Error, Result};
use crate::utils::path::split_forced;
use reqwest::Url;
use std::fmt::Debug;
use std::path::Path;

/// Recognises a source form and rewrites it into a canonical URL.
pub trait Detector: Debug + Send + Sync {
    /// Returns `Ok(None)` if the source is not of this detector's form,
    /// `Ok(Some(url))` with the rewritten URL if it is, and an error if the
    /// source is of this form but malformed.
    fn detect(&self, source: &str, pwd: Option<&Path>) -> Result<Option<String>>;
}

/// Ordered set of detectors.
#[derive(Debug)]
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn Detector>>,
}

impl Default for DetectorRegistry {
    /// GitHub, GitLab, Git over SSH, S3, GCS, then local files.
    fn default() -> Self {
        Self {
            detectors: vec![
                Box::new(GitHubDetector),
                Box::new(GitLabDetector),
                Box::new(GitSshDetector),
                Box::new(S3Detector),
                Box::new(GcsDetector),
                Box::new(FileDetector),
            ],
        }
    }
}

impl DetectorRegistry {
    /// Creates a registry without any detector; only absolute URLs resolve.
    pub fn empty() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Appends a detector, tried after the existing ones.
    pub fn push(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
    }

    /// Inserts a detector ahead of every existing one.
    pub fn push_front(&mut self, detector: Box<dyn Detector>) {
        self.detectors.insert(0, detector);
    }

    /// Number of registered detectors.
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    /// Returns `true` if no detector is registered.
    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Turn `source` into a canonical, fetchable URL.
    ///
    /// Relative file paths are resolved against `pwd`.
    pub fn detect(&self, source: &str, pwd: &Path) -> Result<String> {
        let (forced, rest) = split_forced(source);

        if is_absolute_url(rest) {
            return Ok(source.to_string());
        }

        let pwd = (!pwd.as_os_str().is_empty()).then_some(pwd);
        for detector in &self.detectors {
            if let Some(detected) = detector.detect(rest, pwd)? {
                // A forced fetcher given by the caller wins over the detected one.
                return Ok(match forced {
                    Some(forced) => {
                        let (_, url) = split_forced(&detected);
                        format!("{forced}::{url}")
                    }
                    None => detected,
                });
            }
        }

        Err(Error::UnrecognizedSource(format!(
            "invalid source string: {source}"
        )))
    }
}

fn is_absolute_url(source: &str) -> bool {
    match Url::parse(source) {
        // Single letter schemes are Windows drive letters, not URLs.
        Ok(url) => url.scheme().len() > 1,
        Err(_) => false,
    }
}

fn split_query(source: &str) -> (&str, &str) {
    match source.find('?') {
        Some(index) => source.split_at(index),
        None => (source, ""),
    }
}

/// Rewrites `host/owner/repo[/subdir][?query]` shorthands for a git forge.
fn detect_forge(host: &str, source: &str) -> Result<Option<String>> {
    let Some(rest) = source.strip_prefix(host).and_then(|rest| rest.strip_prefix('/')) else {
        return Ok(None);
    };

    let (path, query) = split_query(rest);
    let parts: Vec<&str> = path.splitn(3, '/').collect();
    if parts.len() < 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(Error::UnrecognizedSource(format!(
            "{host} URLs should be {host}/username/repo, got {source}"
        )));
    }

    let repo = parts[1].strip_suffix(".git").unwrap_or(parts[1]);
    let subdir = match parts.get(2) {
        Some(subdir) if !subdir.is_empty() => format!("//{subdir}"),
        _ => String::new(),
    };

    Ok(Some(format!(
        "git::https://{host}/{}/{repo}.git{subdir}{query}",
        parts[0]
    )))
}

/// `github.com/owner/repo` shorthands.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitHubDetector;

impl Detector for GitHubDetector {
    fn detect(&self, source: &str, _pwd: Option<&Path>) -> Result<Option<String>> {
        detect_forge("github.com", source)
    }
}

/// `gitlab.com/owner/repo` shorthands.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitLabDetector;

impl Detector for GitLabDetector {
    fn detect(&self, source: &str, _pwd: Option<&Path>) -> Result<Option<String>> {
        detect_forge("gitlab.com", source)
    }
}

/// scp-like `user@host:path` Git sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitSshDetector;

impl Detector for GitSshDetector {
    fn detect(&self, source: &str, _pwd: Option<&Path>) -> Result<Option<String>> {
        let Some((user, rest)) = source.split_once('@') else {
            return Ok(None);
        };
        let Some((host, path)) = rest.split_once(':') else {
            return Ok(None);
        };
        let valid = |s: &str| {
            !s.is_empty()
                && s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        };
        if !valid(user) || !valid(host) || path.contains("//") {
            return Ok(None);
        }
        if path.is_empty() {
            return Err(Error::UnrecognizedSource(format!(
                "missing repository path in {source}"
            )));
        }

        Ok(Some(format!(
            "git::ssh://{user}@{host}/{}",
            path.trim_start_matches('/')
        )))
    }
}

/// Amazon S3 sources, path style (`s3.amazonaws.com/bucket/key`) or virtual
/// host style (`bucket.s3-region.amazonaws.com/key`).
#[derive(Debug, Clone, Copy, Default)]
pub struct S3Detector;

impl Detector for S3Detector {
    fn detect(&self, source: &str, _pwd: Option<&Path>) -> Result<Option<String>> {
        let (host, path) = source.split_once('/').unwrap_or((source, ""));
        if !host.ends_with(".amazonaws.com") || !host.contains("s3") {
            return Ok(None);
        }
        if path.is_empty() {
            return Err(Error::UnrecognizedSource(format!(
                "S3 URLs should contain a bucket and a key, got {source}"
            )));
        }

        if host.starts_with("s3") {
            return Ok(Some(format!("s3::https://{host}/{path}")));
        }

        // Virtual host style: move the bucket into the path.
        match host.split_once(".s3") {
            Some((bucket, region_host)) if !bucket.is_empty() => Ok(Some(format!(
                "s3::https://s3{region_host}/{bucket}/{path}"
            ))),
            _ => Err(Error::UnrecognizedSource(format!(
                "unable to find the bucket in {source}"
            ))),
        }
    }
}

/// Google Cloud Storage sources (`www.googleapis.com/storage/v1/bucket/key`).
#[derive(Debug, Clone, Copy, Default)]
pub struct GcsDetector;

impl Detector for GcsDetector {
    fn detect(&self, source: &str, _pwd: Option<&Path>) -> Result<Option<String>> {
        let Some(rest) = source.strip_prefix("www.googleapis.com/storage/") else {
            return Ok(None);
        };
        let segments: Vec<&str> = rest.splitn(3, '/').collect();
        if segments.len() < 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(Error::UnrecognizedSource(format!(
                "GCS URLs should be www.googleapis.com/storage/<version>/<bucket>/<key>, got {source}"
            )));
        }
        Ok(Some(format!("gcs::https://{source}")))
    }
}

/// Local file paths, absolute or relative to the working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDetector;

impl Detector for FileDetector {
    fn detect(&self, source: &str, pwd: Option<&Path>) -> Result<Option<String>> {
        if source.is_empty() {
            return Ok(None);
        }

        let path = Path::new(source);
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            let pwd = pwd.ok_or_else(|| {
                Error::UnrecognizedSource(format!(
                    "relative path {source} requires a working directory"
                ))
            })?;
            pwd.join(path)
        };

        Url::from_file_path(&absolute)
            .map(|url| Some(url.to_string()))
            .map_err(|_| {
                Error::UnrecognizedSource(format!(
                    "{} is not a valid file path",
                    absolute.display()
                ))
            })
    }
}
