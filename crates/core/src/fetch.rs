//! Page fetching over HTTP.
//!
//! This module provides [`fetch_url`] for retrieving HTML pages and the
//! [`PageFetcher`] seam the content resolver fetches through.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::{AgendaError, Result};

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent string sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 15,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
        }
    }
}

impl FetchConfig {
    /// Builds a reqwest client honouring the timeout.
    pub fn client(&self) -> Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(self.timeout))
            .build()
            .map_err(AgendaError::Http)
    }
}

/// Fetches a page and returns its body as text.
///
/// Sends a browser-like User-Agent, respects the configured timeout and
/// treats any non-2xx status as an error.
pub async fn fetch_url(client: &Client, url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url.trim()).map_err(|e| AgendaError::InvalidUrlFormat(e.to_string()))?;

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() { AgendaError::Timeout { timeout: config.timeout } } else { AgendaError::Http(e) }
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AgendaError::HttpStatus { status: status.as_u16(), url: url.to_string() });
    }

    Ok(response.text().await?)
}

/// Capability for retrieving the HTML of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the body of `url`, or an error for transport failures and non-2xx statuses.
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// [`PageFetcher`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = config.client()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        tracing::debug!(url, "fetching page");
        fetch_url(&self.client, url, &self.config).await
    }
}
