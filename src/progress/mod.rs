//! Progress bar styling for transfers.
//!
//! Bars are hidden unless enabled through
//! [`DownloaderBuilder::progress`](crate::downloader::DownloaderBuilder::progress).

pub(crate) mod style;

pub use style::ProgressBarOpts;
