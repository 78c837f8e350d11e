use anyhow::Result;
use async_trait::async_trait;
use reqwest::Url;

/// Seam over the HTTP transport used to download the CSV resource.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetches the full body at `url`, failing on transport errors and
    /// non-success statuses.
    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>>;
}
