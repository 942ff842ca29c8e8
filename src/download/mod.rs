//! Download module containing per-file building blocks.
//!
//! - [`checksum`] - File integrity verification through hash checking
//! - [`options`] - The per-call [`DownloadOptions`]
//!
//! # Examples
//!
//! ```rust
//! use downloadmanager::download::{detect_hash_type, DownloadOptions, HashType};
//!
//! let hash = "d41d8cd98f00b204e9800998ecf8427e";
//! assert_eq!(detect_hash_type(hash), Some(HashType::Md5));
//!
//! let options = DownloadOptions::new().md5_sum(hash);
//! assert_eq!(options.expected_md5_sum(), Some(hash));
//! ```

pub mod checksum;
pub mod options;

pub use checksum::{compute_hash, detect_hash_type, verify_hash, HashType};
pub use options::DownloadOptions;
