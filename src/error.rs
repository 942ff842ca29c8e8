//! Error handling for the download manager.
//!
//! Every fallible operation of the crate returns [`Result`], whose error side is
//! the single [`Error`] enum below. Transport failures are kept as the
//! transport's own error type so callers keep the full diagnostic chain.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can happen when downloading, verifying or extracting a file.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an underlying system.
    ///
    /// Used for failures that don't fit the other categories, such as a
    /// blocking task that panicked or a logger installed twice.
    #[error("Internal error: {0}")]
    Internal(String),

    /// The caller handed in something unusable, like an empty URL.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No detector recognises the source string.
    #[error("Unrecognized source: {0}")]
    UnrecognizedSource(String),

    /// The URL given to the downloader cannot be resolved by any detector.
    #[error("Unable to resolve url {url}")]
    UnresolvedUrl {
        url: String,
        #[source]
        source: Box<Error>,
    },

    /// A source was detected but no fetcher is registered for its scheme.
    #[error("No fetcher registered for scheme \"{scheme}\" (url {url})")]
    UnsupportedScheme { scheme: String, url: String },

    /// The target directory could not be created.
    #[error("Failed to create {} directory", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The destination of a transfer could not be prepared or written.
    #[error("Unable to write {}", path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A freshly downloaded file does not match its expected checksum.
    ///
    /// The file has already been removed when this error is returned.
    #[error("Checksum mismatch for {}: expected {expected}", path.display())]
    ChecksumMismatch { path: PathBuf, expected: String },

    /// Archive extraction failed.
    #[error("Failed to extract {}", path.display())]
    Extraction {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Context wrapper added by [`Downloader::download_into`](crate::Downloader::download_into).
    #[error("Unable to download url {url} into {}", path.display())]
    Download {
        url: String,
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// I/O Error.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Transfer error raised by the HTTP middleware stack.
    #[error(transparent)]
    Middleware(#[from] reqwest_middleware::Error),

    /// Error from the Reqwest library.
    ///
    /// Covers HTTP status errors and failures while streaming a response body.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },
}

impl Error {
    /// Returns the innermost error, looking through the context wrappers the
    /// downloader adds.
    pub fn root(&self) -> &Error {
        match self {
            Error::Download { source, .. } | Error::UnresolvedUrl { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type alias for operations that can fail with a download manager error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_unwraps_context() {
        let inner = Error::InvalidInput("invalid empty url".into());
        let err = Error::Download {
            url: "http://host/file".into(),
            path: PathBuf::from("/tmp/file"),
            source: Box::new(inner),
        };
        assert!(matches!(err.root(), Error::InvalidInput(_)));
    }

    #[test]
    fn test_display_includes_context() {
        let err = Error::Download {
            url: "http://host/file.json".into(),
            path: PathBuf::from("/tmp/x/file.json"),
            source: Box::new(Error::Internal("boom".into())),
        };
        let message = err.to_string();
        assert!(message.contains("http://host/file.json"));
        assert!(message.contains("/tmp/x/file.json"));
    }
}
