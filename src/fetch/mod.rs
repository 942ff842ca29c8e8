//! Source detection and transfer.
//!
//! A source string is first rewritten by the [`DetectorRegistry`] into a
//! canonical URL, possibly carrying a forced fetcher prefix (`git::`, `s3::`,
//! `gcs::`). The [`FetchClient`] then hands the URL to the [`Fetcher`]
//! registered for that prefix or for the URL scheme.
//!
//! ```rust
//! use downloadmanager::fetch::DetectorRegistry;
//! use std::path::Path;
//!
//! # fn main() -> downloadmanager::Result<()> {
//! let registry = DetectorRegistry::default();
//! assert_eq!(
//!     registry.detect("github.com/onnx/models", Path::new("/"))?,
//!     "git::https://github.com/onnx/models.git"
//! );
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod detect;
pub mod file;
pub mod http;

pub use client::{FetchClient, Fetcher};
pub use detect::{
    Detector, DetectorRegistry, FileDetector, GcsDetector, GitHubDetector, GitLabDetector,
    GitSshDetector, S3Detector,
};
pub use file::FileFetcher;
pub use http::HttpFetcher;
