//! Tarball extraction, plain or behind a decompressor.

use std::io::{self, Read};
use std::path::Path;

/// Unpack every entry of the tar stream `reader` into `target_dir`.
///
/// Existing files are overwritten. Entries pointing outside `target_dir`
/// (absolute paths, `..`) are skipped by the tar crate.
pub fn unpack<R: Read>(reader: R, target_dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(target_dir)?;
    let mut archive = ::tar::Archive::new(reader);
    archive.set_overwrite(true);
    archive.set_preserve_permissions(true);
    archive.unpack(target_dir)
}
