//! Per-call download options.

/// Options controlling a single [`Downloader`](crate::Downloader) call.
///
/// ```rust
/// use downloadmanager::DownloadOptions;
///
/// let options = DownloadOptions::new()
///     .cache(false)
///     .md5_sum("9f0f51b5e686c000b68629e4300decdd");
/// assert!(options.check_md5_sum_enabled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Read and refresh the cache.
    cache: bool,
    /// Checksum validation is mandatory.
    check_md5_sum: bool,
    /// Expected checksum of the file.
    md5_sum: Option<String>,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            cache: true,
            check_md5_sum: true,
            md5_sum: None,
        }
    }
}

impl DownloadOptions {
    /// Creates the default options: cache on, checksum checking on, no
    /// expected checksum.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the cache.
    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Makes checksum validation mandatory or not.
    pub fn check_md5_sum(mut self, check: bool) -> Self {
        self.check_md5_sum = check;
        self
    }

    /// Sets the expected checksum and turns checking on.
    ///
    /// An empty value means "no specific value to check".
    pub fn md5_sum(mut self, md5_sum: impl Into<String>) -> Self {
        let md5_sum = md5_sum.into();
        self.md5_sum = (!md5_sum.trim().is_empty()).then_some(md5_sum);
        self.check_md5_sum = true;
        self
    }

    /// Gets whether the cache is used.
    pub fn cache_enabled(&self) -> bool {
        self.cache
    }

    /// Gets whether checksum validation is mandatory.
    pub fn check_md5_sum_enabled(&self) -> bool {
        self.check_md5_sum
    }

    /// Gets the expected checksum, if any.
    pub fn expected_md5_sum(&self) -> Option<&str> {
        self.md5_sum.as_deref()
    }

    /// The checksum to verify against, when verification applies.
    pub(crate) fn checksum_to_verify(&self) -> Option<&str> {
        self.md5_sum.as_deref().filter(|_| self.check_md5_sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DownloadOptions::default();
        assert!(options.cache_enabled());
        assert!(options.check_md5_sum_enabled());
        assert_eq!(options.expected_md5_sum(), None);
        assert_eq!(options.checksum_to_verify(), None);
    }

    #[test]
    fn test_empty_md5_sum_is_none() {
        let options = DownloadOptions::new().md5_sum("");
        assert_eq!(options.expected_md5_sum(), None);
    }

    #[test]
    fn test_checksum_to_verify_respects_flag() {
        let options = DownloadOptions::new()
            .md5_sum("5eb63bbbe01eeed093cb22bb8f5acdc3")
            .check_md5_sum(false);
        assert_eq!(options.checksum_to_verify(), None);
        assert_eq!(
            options.expected_md5_sum(),
            Some("5eb63bbbe01eeed093cb22bb8f5acdc3")
        );
    }
}
