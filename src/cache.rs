//! In-memory cache of resolved download paths.
//!
//! The cache maps a [`CacheKey`] (source URL + target path) to the path of a
//! file that was already downloaded or validated. Entries expire after a TTL;
//! nothing is persisted across process restarts.
//!
//! # Examples
//!
//! ```rust
//! use std::time::Duration;
//! use downloadmanager::cache::{Cache, CacheKey, Expiration};
//!
//! let cache = Cache::new(Duration::from_secs(60));
//! let key = CacheKey::new("https://example.com/file.zip", "/tmp/file.zip");
//!
//! cache.set(key.to_string(), "/tmp/file.zip", Expiration::Default);
//! assert_eq!(cache.get(&key.to_string()), Some("/tmp/file.zip".into()));
//! ```

use dashmap::DashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Default time-to-live applied by [`Cache::default`].
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Identifies one (url, destination) download intent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    url: String,
    target: PathBuf,
}

impl CacheKey {
    /// Creates a new [`CacheKey`].
    pub fn new(url: impl Into<String>, target: impl AsRef<Path>) -> Self {
        Self {
            url: url.into(),
            target: target.as_ref().to_path_buf(),
        }
    }

    /// The source URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The target file path.
    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key:{},path:{}", self.url, self.target.display())
    }
}

/// Lifetime of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// Use the default TTL of the cache.
    Default,
    /// Keep the entry until it is deleted.
    Never,
    /// Expire after the given duration.
    After(Duration),
}

#[derive(Debug, Clone)]
struct Entry {
    path: PathBuf,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Thread-safe key/value store with TTL based expiration.
///
/// Expired entries are dropped when they are looked up and on every write,
/// so the store never outgrows its live entries plus those expired since the
/// last write. Share it between downloaders by wrapping it in an
/// [`Arc`](std::sync::Arc).
#[derive(Debug)]
pub struct Cache {
    default_ttl: Duration,
    entries: DashMap<String, Entry>,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl Cache {
    /// Creates an empty cache whose [`Expiration::Default`] is `default_ttl`.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            entries: DashMap::new(),
        }
    }

    /// Gets the TTL applied to [`Expiration::Default`] entries.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns the path stored under `key`, unless it is missing or expired.
    ///
    /// An expired entry is removed on the way.
    pub fn get(&self, key: &str) -> Option<PathBuf> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Some(entry.path.clone());
            }
        }
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    /// Stores `path` under `key`, replacing any previous entry.
    ///
    /// Expired entries are purged first.
    pub fn set(&self, key: impl Into<String>, path: impl Into<PathBuf>, expiration: Expiration) {
        let now = Instant::now();
        let expires_at = match expiration {
            Expiration::Default => now.checked_add(self.default_ttl),
            Expiration::Never => None,
            Expiration::After(ttl) => now.checked_add(ttl),
        };
        self.entries.retain(|_, entry| !entry.is_expired(now));
        self.entries.insert(
            key.into(),
            Entry {
                path: path.into(),
                expires_at,
            },
        );
    }

    /// Removes `key`, returning its path if it was present and not expired.
    pub fn delete(&self, key: &str) -> Option<PathBuf> {
        self.entries
            .remove(key)
            .filter(|(_, entry)| !entry.is_expired(Instant::now()))
            .map(|(_, entry)| entry.path)
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    /// Number of live entries. Expired ones are purged before counting.
    pub fn len(&self) -> usize {
        self.purge_expired();
        self.entries.len()
    }

    /// Returns `true` if the cache holds no live entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
