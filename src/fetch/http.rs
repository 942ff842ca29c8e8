//! Fetcher for `http://` and `https://` URLs.

use super::client::Fetcher;
use crate::error::{Error, Result};
use crate::progress::ProgressBarOpts;

use async_trait::async_trait;
use futures::StreamExt;
use indicatif::ProgressBar;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::{fs, fs::File, io::AsyncWriteExt};
use tracing::debug;

/// Streams the response body to disk.
///
/// The body is written to `<dest>.part` and renamed once complete, so an
/// interrupted transfer never leaves a truncated file at `dest`.
#[derive(Clone)]
pub struct HttpFetcher {
    client: ClientWithMiddleware,
    progress: ProgressBarOpts,
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

impl HttpFetcher {
    /// Creates a fetcher around an already configured client.
    pub fn new(client: ClientWithMiddleware, progress: ProgressBarOpts) -> Self {
        Self { client, progress }
    }

    async fn stream_body(
        &self,
        res: reqwest::Response,
        file: &mut File,
        pb: &ProgressBar,
    ) -> Result<u64> {
        let mut written = 0;
        let mut stream = res.bytes_stream();
        while let Some(item) = stream.next().await {
            let mut chunk = item?;
            let chunk_size = chunk.len() as u64;
            file.write_all_buf(&mut chunk).await?;
            written += chunk_size;
            pb.inc(chunk_size);
        }
        file.flush().await?;
        Ok(written)
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_file(&self, url: &Url, dest: &Path) -> Result<()> {
        debug!("Fetching {}", url);
        let res = self.client.get(url.clone()).send().await?;
        let res = res.error_for_status()?;
        let size = res.content_length().unwrap_or(0);

        let partial = partial_path(dest);
        debug!("Creating destination file {:?}", &partial);
        let mut file = File::create(&partial)
            .await
            .map_err(|source| Error::Path {
                path: partial.clone(),
                source,
            })?;

        let pb = self.progress.to_progress_bar(size);
        if let Some(name) = dest.file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }

        let written = match self.stream_body(res, &mut file, &pb).await {
            Ok(written) => written,
            Err(e) => {
                drop(file);
                pb.abandon();
                if let Err(rm) = fs::remove_file(&partial).await {
                    debug!("Could not remove {:?}: {}", partial, rm);
                }
                return Err(e);
            }
        };
        drop(file);
        self.progress.finish(&pb);

        fs::rename(&partial, dest)
            .await
            .map_err(|source| Error::Path {
                path: dest.to_path_buf(),
                source,
            })?;
        debug!("Retrieved {} bytes into {:?}", written, dest);
        Ok(())
    }
}
