//! Image preloading
//!
//! Fetching the image while the progress bar is still running means it is in
//! cache by the time the page shows it. A failed preload is not fatal; the
//! image element just ends up broken.

use std::time::Duration;

use async_trait::async_trait;

use crate::Result;

#[async_trait]
pub trait ImagePreloader: Send + Sync {
    /// Resolves once the image has loaded or definitely failed
    async fn preload(&self, url: &str) -> Result<()>;
}

/// Downloads the image body with reqwest
#[derive(Debug, Clone)]
pub struct HttpPreloader {
    client: reqwest::Client,
}

impl HttpPreloader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpPreloader { client })
    }
}

#[async_trait]
impl ImagePreloader for HttpPreloader {
    async fn preload(&self, url: &str) -> Result<()> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        tracing::debug!(url, bytes = bytes.len(), "image preloaded");
        Ok(())
    }
}

/// Resolves immediately; used when nothing should be fetched ahead of time
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipPreload;

#[async_trait]
impl ImagePreloader for SkipPreload {
    async fn preload(&self, _url: &str) -> Result<()> {
        Ok(())
    }
}
