//! Transport for the CSV resource: HTTP(S) URLs or local paths.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::debug;

/// Returns `true` when `source` should be fetched over HTTP rather than read
/// from disk.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Loads the raw bytes of `source` with a plain HTTP client for URLs.
pub async fn read_source(source: &str) -> Result<Vec<u8>> {
    read_source_with(&BasicClient::new(), source).await
}

/// Loads the raw bytes of `source`, fetching URLs through `client` and
/// reading anything else from the filesystem.
pub async fn read_source_with<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(source) {
        let url = source.parse().with_context(|| format!("invalid URL {source}"))?;
        client
            .get_bytes(url)
            .await
            .with_context(|| format!("failed to fetch {source}"))?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read {source}"))?
    };
    debug!(source, bytes = bytes.len(), "Source bytes loaded");
    Ok(bytes)
}
