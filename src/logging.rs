//! Logging setup.
//!
//! The library itself only emits `tracing` events. Binaries embedding it can
//! call [`LogConfig::init`] once at startup to get a formatted subscriber on
//! stderr.
//!
//! ```rust,no_run
//! use downloadmanager::logging::LogConfig;
//!
//! # fn main() -> downloadmanager::Result<()> {
//! LogConfig::new("model-server").verbose(true).init()?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Logger settings: the application identity and the default verbosity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Name of the embedding application, attached to the startup event.
    pub app_name: String,
    /// Log at `info` level.
    pub verbose: bool,
    /// Log at `debug` level. Takes precedence over `verbose`.
    pub debug: bool,
}

impl LogConfig {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Self::default()
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Level used when `RUST_LOG` is not set.
    pub fn default_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }

    /// Install the global subscriber.
    ///
    /// `RUST_LOG` wins over the configured verbosity. Installing twice is an
    /// [`Error::Internal`].
    pub fn init(&self) -> Result<()> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_level()));

        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| Error::Internal(format!("Unable to install the logger: {}", e)))?;

        debug!(app = %self.app_name, "logger initialised");
        Ok(())
    }
}
