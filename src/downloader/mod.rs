//! Downloader module containing the download orchestration, its builder and
//! its configuration.
//!
//! - `downloader` - [`Downloader`] with `download_file` and `download_into`
//! - `builder` - [`DownloaderBuilder`] for flexible configuration
//! - `config` - [`DownloaderConfig`] and its defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use downloadmanager::downloader::DownloaderBuilder;
//! use downloadmanager::DownloadOptions;
//!
//! # async fn example() -> downloadmanager::Result<()> {
//! let downloader = DownloaderBuilder::new().app_name("model-server").build()?;
//! let file = downloader
//!     .download_into("https://example.com/squeezenet.zip", "models/squeezenet", &DownloadOptions::new())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod downloader;
mod inflight;

pub use builder::DownloaderBuilder;
pub use config::DownloaderConfig;
pub use downloader::{Downloaded, Downloader};
