//! HTTP client construction shared by the HTTP fetcher.

pub mod client;

pub use client::{create_http_client, HttpClientConfig, DEFAULT_USER_AGENT};
