//! Downloadmanager fetches single files for applications that need local
//! copies of remote assets, such as model weights or label files.
//!
//! A download goes through a cache lookup, source detection, the transfer
//! itself, checksum verification and, for [`Downloader::download_into`],
//! archive extraction.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use downloadmanager::{DownloadOptions, DownloaderBuilder, Error};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let downloader = DownloaderBuilder::new().build()?;
//! let weights = downloader
//!     .download_into(
//!         "https://example.com/models/resnet50.tar.gz",
//!         "models/resnet50",
//!         &DownloadOptions::new().check_md5_sum(false),
//!     )
//!     .await?;
//! println!("{}", weights.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`archive`] - Archive extraction by file suffix
//! - [`cache`] - TTL cache of completed downloads
//! - [`download`] - Per-call options and checksum verification
//! - [`downloader`] - The [`Downloader`] and [`DownloaderBuilder`]
//! - [`error`] - Centralized error handling with the [`Error`] enum
//! - [`fetch`] - Source detection and transports
//! - [`http`] - HTTP client construction
//! - [`logging`] - Subscriber setup for binaries
//! - [`progress`] - Progress bar styling
//! - [`utils`] - Shared path helpers

pub mod archive;
pub mod cache;
pub mod download;
pub mod downloader;
pub mod error;
pub mod fetch;
pub mod http;
pub mod logging;
pub mod progress;
pub mod utils;

pub use cache::{Cache, CacheKey, Expiration};
pub use download::{detect_hash_type, verify_hash, DownloadOptions, HashType};
pub use downloader::{Downloaded, Downloader, DownloaderBuilder};
pub use error::{Error, Result};
pub use fetch::{FetchClient, Fetcher};
pub use progress::ProgressBarOpts;
