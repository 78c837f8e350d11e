use super::client::HttpClient;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Url;

/// Plain reqwest client with no authentication.
#[derive(Default)]
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>> {
        let resp = self.0.get(url).send().await?.error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    }
}
