//! Integration tests for the downloadmanager crate.
//!
//! These tests go through the public API only: crate root re-exports, cache
//! sharing between downloaders, pluggable fetchers and error chains.

use async_trait::async_trait;
use downloadmanager::fetch::{DetectorRegistry, FileFetcher};
use downloadmanager::{
    detect_hash_type, verify_hash, Cache, CacheKey, DownloadOptions, Error, Expiration, Fetcher,
    HashType, Result,
};
use reqwest::Url;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

mod common;
use common::helpers::*;

#[derive(Debug, Default)]
struct RecordingFetcher {
    urls: Mutex<Vec<String>>,
}

#[async_trait]
impl Fetcher for RecordingFetcher {
    async fn get_file(&self, url: &Url, dest: &Path) -> Result<()> {
        self.urls.lock().unwrap().push(url.to_string());
        tokio::fs::write(dest, HELLO).await?;
        Ok(())
    }
}

#[tokio::test]
async fn test_shared_cache_between_downloaders() {
    let temp_dir = create_temp_dir();
    let source = create_temp_file(temp_dir.path(), "remote/labels.txt", HELLO);
    let target = temp_dir.path().join("local/labels.txt");
    let url = file_url(&source);

    let cache = Arc::new(Cache::new(Duration::from_secs(60)));
    let first = test_downloader_builder().cache(cache.clone()).build().unwrap();
    let second = test_downloader_builder().cache(cache.clone()).build().unwrap();

    assert!(first
        .download_file(&url, &target, &DownloadOptions::new())
        .await
        .unwrap()
        .did_download);
    assert!(!second
        .download_file(&url, &target, &DownloadOptions::new())
        .await
        .unwrap()
        .did_download);

    let key = CacheKey::new(url.as_str(), &target).to_string();
    assert_eq!(cache.get(&key), Some(target));
}

#[tokio::test]
async fn test_disabled_cache_is_not_written() {
    let temp_dir = create_temp_dir();
    let source = create_temp_file(temp_dir.path(), "remote/labels.txt", HELLO);
    let downloader = test_downloader();

    downloader
        .download_file(
            &file_url(&source),
            temp_dir.path().join("local/labels.txt"),
            &DownloadOptions::new().cache(false),
        )
        .await
        .unwrap();

    assert!(downloader.cache().is_empty());
}

#[tokio::test]
async fn test_expired_cache_entry_is_ignored() {
    let temp_dir = create_temp_dir();
    let target = create_temp_file(temp_dir.path(), "local/labels.txt", HELLO);
    let url = "file:///nowhere/labels.txt";

    let cache = Arc::new(Cache::default());
    let key = CacheKey::new(url, &target).to_string();
    cache.set(key.as_str(), &target, Expiration::After(Duration::ZERO));
    let downloader = test_downloader_builder().cache(cache).build().unwrap();

    // With the entry expired the orchestrator goes to disk, where the file
    // is reused because it matches the expected checksum.
    let downloaded = downloader
        .download_file(url, &target, &DownloadOptions::new().md5_sum(HELLO_MD5))
        .await
        .unwrap();

    assert!(!downloaded.did_download);
    assert_eq!(downloader.cache().get(&key), Some(target));
}

#[tokio::test]
async fn test_expired_entries_are_dropped_by_later_downloads() {
    let temp_dir = create_temp_dir();
    let source = create_temp_file(temp_dir.path(), "remote/labels.txt", HELLO);
    let url = file_url(&source);
    let cache = Arc::new(Cache::new(Duration::from_millis(1)));
    let downloader = test_downloader_builder().cache(cache.clone()).build().unwrap();

    for i in 0..20 {
        downloader
            .download_file(
                &url,
                temp_dir.path().join(format!("local/{i}.txt")),
                &DownloadOptions::new(),
            )
            .await
            .unwrap();
    }
    tokio::time::sleep(Duration::from_millis(20)).await;

    downloader
        .download_file(&url, temp_dir.path().join("local/last.txt"), &DownloadOptions::new())
        .await
        .unwrap();

    assert!(cache.len() <= 1);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_custom_fetcher_for_forced_scheme() {
    let temp_dir = create_temp_dir();
    let recorder = Arc::new(RecordingFetcher::default());
    let downloader = test_downloader_builder()
        .fetcher("git", recorder.clone())
        .build()
        .unwrap();

    let path = downloader
        .download_into("github.com/onnx/models", temp_dir.path(), &DownloadOptions::new())
        .await
        .unwrap();

    assert_eq!(path, temp_dir.path().join("models"));
    assert_eq!(
        recorder.urls.lock().unwrap().as_slice(),
        ["https://github.com/onnx/models.git"]
    );
}

#[tokio::test]
async fn test_unsupported_scheme_without_fetcher() {
    let temp_dir = create_temp_dir();

    let err = test_downloader()
        .download_file(
            "s3.amazonaws.com/bucket/model.onnx",
            temp_dir.path().join("model.onnx"),
            &DownloadOptions::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnsupportedScheme { ref scheme, .. } if scheme == "s3"));
}

#[tokio::test]
async fn test_fetcher_can_replace_file_transport() {
    let temp_dir = create_temp_dir();
    let source = create_temp_file(temp_dir.path(), "remote/labels.txt", b"ignored");
    let recorder = Arc::new(RecordingFetcher::default());
    let downloader = test_downloader_builder()
        .fetcher("file", recorder.clone())
        .build()
        .unwrap();

    downloader
        .download_file(
            &file_url(&source),
            temp_dir.path().join("local/labels.txt"),
            &DownloadOptions::new().md5_sum(HELLO_MD5),
        )
        .await
        .unwrap();

    assert_eq!(recorder.urls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_custom_detector_registry() {
    let temp_dir = create_temp_dir();
    let downloader = test_downloader_builder()
        .detectors(DetectorRegistry::empty())
        .fetcher("local", Arc::new(FileFetcher))
        .build()
        .unwrap();

    let err = downloader
        .download_file(
            "relative/labels.txt",
            temp_dir.path().join("labels.txt"),
            &DownloadOptions::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnresolvedUrl { .. }));
    assert!(err.to_string().contains("relative/labels.txt"));
}

#[test]
fn test_checksum_reexports() {
    let temp_dir = create_temp_dir();
    let file = create_temp_file(temp_dir.path(), "labels.txt", HELLO);

    assert_eq!(detect_hash_type(HELLO_MD5), Some(HashType::Md5));
    assert_eq!(detect_hash_type(HELLO_SHA256), Some(HashType::Sha256));
    assert!(verify_hash(&file, &HELLO_MD5.to_uppercase()).unwrap());
    assert!(!verify_hash(&file, "not-a-hash").unwrap());
}
