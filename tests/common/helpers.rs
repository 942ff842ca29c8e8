#![allow(dead_code)]

use downloadmanager::{Downloader, DownloaderBuilder};
use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::Url;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

// Common test constants
pub const HELLO: &[u8] = b"hello world";
pub const HELLO_MD5: &str = "5eb63bbbe01eeed093cb22bb8f5acdc3";
pub const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
pub const EMPTY_MD5: &str = "d41d8cd98f00b204e9800998ecf8427e";

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates a file with the given content, parents included
pub fn create_temp_file(dir: &Path, filename: &str, content: &[u8]) -> PathBuf {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(&file_path, content).expect("Failed to write temporary file");
    file_path
}

/// `file://` URL of a local path
pub fn file_url(path: &Path) -> String {
    Url::from_file_path(path)
        .expect("Path should be absolute")
        .to_string()
}

/// Downloader without retries nor progress bars
pub fn test_downloader() -> Downloader {
    test_downloader_builder()
        .build()
        .expect("Failed to build downloader")
}

pub fn test_downloader_builder() -> DownloaderBuilder {
    DownloaderBuilder::new().retries(0)
}

/// Builds an in-memory `.tar.gz` archive
pub fn tar_gz_bytes(members: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, *content)
            .expect("Failed to append tar member");
    }
    builder
        .into_inner()
        .expect("Failed to finish tar")
        .finish()
        .expect("Failed to finish gzip")
}

/// Builds an in-memory `.zip` archive
pub fn zip_bytes(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in members {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("Failed to start zip member");
        writer.write_all(content).expect("Failed to write zip member");
    }
    writer.finish().expect("Failed to finish zip").into_inner()
}

/// Asserts that a file exists at the given path
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "File should exist at path: {:?}", path);
}

/// Asserts that a file holds exactly `expected`
pub fn assert_file_content(path: &Path, expected: &[u8]) {
    let content = fs::read(path).expect("Failed to read file");
    assert_eq!(content, expected, "Content mismatch at path: {:?}", path);
}
