//! HTTP archive fetcher.

use async_trait::async_trait;
use tracing::debug;

use super::ArchiveFetcher;
use crate::error::{Error, Result};

/// Downloads archives over HTTP(S) with `reqwest`
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with a default client
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fetcher around an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArchiveFetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!(%url, "Downloading archive");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::acquisition(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::acquisition(url, format!("HTTP {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::acquisition(url, e))?;

        debug!(%url, bytes = bytes.len(), "Archive downloaded");
        Ok(bytes.to_vec())
    }
}
