//! Fetcher for `file://` URLs.

use super::client::Fetcher;
use crate::error::{Error, Result};

use async_trait::async_trait;
use reqwest::Url;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Copies a local file to the destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

#[async_trait]
impl Fetcher for FileFetcher {
    async fn get_file(&self, url: &Url, dest: &Path) -> Result<()> {
        let source = url
            .to_file_path()
            .map_err(|_| Error::InvalidUrl(format!("The url \"{}\" is not a local file", url)))?;

        let metadata = fs::metadata(&source).await?;
        if metadata.is_dir() {
            return Err(Error::InvalidInput(format!(
                "{} is a directory, only single files can be fetched",
                source.display()
            )));
        }

        if source == dest {
            debug!("Source and destination are the same file, nothing to copy");
            return Ok(());
        }

        debug!("Copying {:?} to {:?}", source, dest);
        fs::copy(&source, dest)
            .await
            .map_err(|source| Error::Path {
                path: dest.to_path_buf(),
                source,
            })?;
        Ok(())
    }
}
