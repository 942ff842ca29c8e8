//! Checksum verification for downloaded files.
//!
//! The expected value decides which digest is computed: 32 hex characters are
//! read as MD5, 64 hex characters as SHA-256. Files are streamed through the
//! digest in fixed size chunks, so large downloads never need to be resident
//! in memory.
//!
//! # Examples
//!
//! ## Hash Type Detection
//!
//! ```rust
//! use downloadmanager::download::checksum::{detect_hash_type, HashType};
//!
//! assert_eq!(detect_hash_type("d41d8cd98f00b204e9800998ecf8427e"), Some(HashType::Md5));
//! assert_eq!(detect_hash_type("invalid"), None);
//! ```
//!
//! ## File Verification
//!
//! ```rust,no_run
//! use downloadmanager::download::checksum::verify_hash;
//! use std::path::Path;
//!
//! match verify_hash(Path::new("downloaded_file.zip"), "d41d8cd98f00b204e9800998ecf8427e") {
//!     Ok(true) => println!("Hash verification passed!"),
//!     Ok(false) => println!("Hash verification failed!"),
//!     Err(e) => println!("Error during verification: {}", e),
//! }
//! ```

use md5::Md5;
use sha2::digest::Output;
use sha2::{Digest, Sha256};
use std::fmt::LowerHex;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 64 * 1024;

/// Supported hash types for file verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    /// MD5 hash algorithm
    Md5,
    /// SHA-256 hash algorithm
    Sha256,
}

/// Detect hash type based on the hash string format.
///
/// # Examples
///
/// ```
/// use downloadmanager::download::checksum::{detect_hash_type, HashType};
///
/// assert_eq!(detect_hash_type("9f0f51b5e686c000b68629e4300decdd"), Some(HashType::Md5));
/// assert_eq!(
///     detect_hash_type("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"),
///     Some(HashType::Sha256)
/// );
/// assert_eq!(detect_hash_type("1127497"), None);
/// ```
pub fn detect_hash_type(hash: &str) -> Option<HashType> {
    if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hash.len() {
        32 => Some(HashType::Md5),
        64 => Some(HashType::Sha256),
        _ => None,
    }
}

/// Compute the lowercase hex digest of a file.
pub fn compute_hash(file_path: &Path, hash_type: HashType) -> io::Result<String> {
    let file = File::open(file_path)?;
    match hash_type {
        HashType::Md5 => digest_reader::<Md5, _>(file),
        HashType::Sha256 => digest_reader::<Sha256, _>(file),
    }
}

/// Verify the content of a local file against an expected hash.
///
/// # Returns
///
/// * `Ok(true)` if the digest matches, ignoring hex case
/// * `Ok(false)` if it doesn't, or if `expected_hash` is not a recognised format
/// * `Err` if the file can't be read
pub fn verify_hash(file_path: &Path, expected_hash: &str) -> io::Result<bool> {
    let expected_hash = expected_hash.trim();
    let Some(hash_type) = detect_hash_type(expected_hash) else {
        return Ok(false);
    };

    let calculated = compute_hash(file_path, hash_type)?;
    Ok(calculated.eq_ignore_ascii_case(expected_hash))
}

fn digest_reader<D: Digest, R: Read>(reader: R) -> io::Result<String>
where
    Output<D>: LowerHex,
{
    let mut reader = BufReader::with_capacity(CHUNK_SIZE, reader);
    let mut hasher = D::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
