//! Archive extraction functionality.
//!
//! The format of a downloaded file is chosen from its name: the longest
//! matching suffix in [`FORMATS`] wins, so `data.tar.gz` is unpacked as a
//! gzipped tarball rather than a single gzip stream. Files whose name matches
//! no known suffix are left alone.
//!
//! # Examples
//!
//! ```rust
//! use std::path::Path;
//! use downloadmanager::archive::ArchiveFormat;
//!
//! assert_eq!(
//!     ArchiveFormat::detect(Path::new("model.tar.gz")),
//!     Some((ArchiveFormat::TarGz, "tar.gz"))
//! );
//! assert_eq!(ArchiveFormat::detect(Path::new("data.txt")), None);
//! ```

pub mod tar;
pub mod zip;

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Archive and compression formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
    TarBz2,
    TarXz,
    Gz,
    Bz2,
    Xz,
}

/// Known suffixes, without the leading dot, and the format they select.
pub const FORMATS: &[(&str, ArchiveFormat)] = &[
    ("tar.gz", ArchiveFormat::TarGz),
    ("tgz", ArchiveFormat::TarGz),
    ("tar.bz2", ArchiveFormat::TarBz2),
    ("tar.tbz2", ArchiveFormat::TarBz2),
    ("tbz2", ArchiveFormat::TarBz2),
    ("tar.xz", ArchiveFormat::TarXz),
    ("txz", ArchiveFormat::TarXz),
    ("tar", ArchiveFormat::Tar),
    ("zip", ArchiveFormat::Zip),
    ("gz", ArchiveFormat::Gz),
    ("bz2", ArchiveFormat::Bz2),
    ("xz", ArchiveFormat::Xz),
];

impl ArchiveFormat {
    /// Detect the format of `path` by longest matching suffix.
    ///
    /// Returns the format together with the suffix that selected it.
    pub fn detect(path: &Path) -> Option<(ArchiveFormat, &'static str)> {
        let name = path.file_name()?.to_str()?;
        FORMATS
            .iter()
            .filter(|(suffix, _)| {
                name.strip_suffix(suffix)
                    .is_some_and(|stem| stem.ends_with('.'))
            })
            .max_by_key(|(suffix, _)| suffix.len())
            .map(|(suffix, format)| (*format, *suffix))
    }
}

/// Extract `file_path` into `target_dir`.
///
/// Archive members land directly in `target_dir` and overwrite whatever is
/// there. Single compressed streams (`.gz`, `.bz2`, `.xz`) are written to
/// `target_dir/<name without the suffix>`. Unknown formats are a no-op.
pub fn extract(target_dir: &Path, file_path: &Path) -> Result<()> {
    let Some((format, suffix)) = ArchiveFormat::detect(file_path) else {
        debug!(file = %file_path.display(), "not an archive, skipping extraction");
        return Ok(());
    };

    debug!(
        file = %file_path.display(),
        target = %target_dir.display(),
        ?format,
        "extracting archive"
    );

    let extraction_error = |source: Box<dyn std::error::Error + Send + Sync>| Error::Extraction {
        path: file_path.to_path_buf(),
        source,
    };

    let open = || -> io::Result<BufReader<File>> { File::open(file_path).map(BufReader::new) };

    match format {
        ArchiveFormat::Zip => self::zip::unpack(file_path, target_dir)
            .map_err(|e| extraction_error(Box::new(e))),
        ArchiveFormat::Tar => open()
            .and_then(|reader| self::tar::unpack(reader, target_dir))
            .map_err(|e| extraction_error(e.into())),
        ArchiveFormat::TarGz => open()
            .and_then(|reader| self::tar::unpack(flate2::read::GzDecoder::new(reader), target_dir))
            .map_err(|e| extraction_error(e.into())),
        ArchiveFormat::TarBz2 => open()
            .and_then(|reader| self::tar::unpack(bzip2::read::BzDecoder::new(reader), target_dir))
            .map_err(|e| extraction_error(e.into())),
        ArchiveFormat::TarXz => open()
            .and_then(|reader| self::tar::unpack(xz2::read::XzDecoder::new(reader), target_dir))
            .map_err(|e| extraction_error(e.into())),
        ArchiveFormat::Gz | ArchiveFormat::Bz2 | ArchiveFormat::Xz => {
            let output = decompressed_name(file_path, suffix)
                .map(|name| target_dir.join(name))
                .ok_or_else(|| {
                    extraction_error(format!("cannot derive an output name for {suffix} stream").into())
                })?;
            open()
                .and_then(|reader| match format {
                    ArchiveFormat::Gz => decompress(flate2::read::GzDecoder::new(reader), &output),
                    ArchiveFormat::Bz2 => decompress(bzip2::read::BzDecoder::new(reader), &output),
                    _ => decompress(xz2::read::XzDecoder::new(reader), &output),
                })
                .map_err(|e| extraction_error(e.into()))
        }
    }
}

fn decompressed_name(file_path: &Path, suffix: &str) -> Option<String> {
    let name = file_path.file_name()?.to_str()?;
    let stem = name.strip_suffix(suffix)?.strip_suffix('.')?;
    (!stem.is_empty()).then(|| stem.to_string())
}

fn decompress<R: Read>(mut reader: R, output: &Path) -> io::Result<()> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(output)?;
    io::copy(&mut reader, &mut file)?;
    Ok(())
}
