//! ZIP archive extraction.

use ::zip::result::ZipResult;
use ::zip::ZipArchive;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Extract every member of the ZIP archive at `archive_path` into `target_dir`.
///
/// Members whose names would escape `target_dir` are rejected by the zip
/// crate; existing files are overwritten.
pub fn unpack(archive_path: &Path, target_dir: &Path) -> ZipResult<()> {
    std::fs::create_dir_all(target_dir)?;
    let reader = BufReader::new(File::open(archive_path)?);
    let mut archive = ZipArchive::new(reader)?;
    archive.extract(target_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::extract;
    use ::zip::write::SimpleFileOptions;
    use ::zip::ZipWriter;
    use std::io::Write;

    fn write_zip(path: &Path, members: &[(&str, &[u8])]) {
        let mut writer = ZipWriter::new(File::create(path).unwrap());
        for (name, content) in members {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_extract_zip_flattens_into_target() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bundle.zip");
        write_zip(&archive, &[("synset.txt", b"n01440764"), ("sub/params", b"\x00\x01")]);

        extract(dir.path(), &archive).unwrap();

        assert_eq!(std::fs::read(dir.path().join("synset.txt")).unwrap(), b"n01440764");
        assert_eq!(std::fs::read(dir.path().join("sub/params")).unwrap(), b"\x00\x01");
    }

    #[test]
    fn test_unpack_rejects_non_zip() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("fake.zip");
        std::fs::write(&archive, b"not a zip").unwrap();

        assert!(unpack(&archive, dir.path()).is_err());
    }
}
