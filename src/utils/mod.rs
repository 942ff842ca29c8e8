//! Shared utility functions.
//!
//! - [`path`] - Directory sanitization and file name derivation from URLs

pub mod path;

pub use path::{file_name_from_url, sanitize_dir};
