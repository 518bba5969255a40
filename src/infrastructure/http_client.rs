//! HTTP fetch adapter
//!
//! Thin `reqwest` wrapper implementing `PageFetcher`. One attempt per call:
//! non-2xx statuses and network failures both surface as `TransportError`
//! and the crawl policy decides what happens next.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::errors::TransportError;
use crate::domain::services::{FetchedPage, PageFetcher};
use crate::infrastructure::config::HttpConfig;

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub follow_redirects: bool,
    pub max_redirects: usize,
}

impl From<&HttpConfig> for HttpClientConfig {
    fn from(config: &HttpConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout_seconds: config.timeout_seconds,
            follow_redirects: config.follow_redirects,
            max_redirects: config.max_redirects,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from(&HttpConfig::default())
    }
}

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(config.max_redirects)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .context("Failed to create HTTP client")?;

        debug!("HTTP client ready (timeout {}s)", config.timeout_seconds);
        Ok(Self { client, config })
    }

    pub const fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn get(&self, url: &str) -> Result<FetchedPage, TransportError> {
        info!("HTTP GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::network(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::status(url, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::network(url, format!("failed to read body: {e}")))?;

        debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(FetchedPage {
            status: status.as_u16(),
            body,
        })
    }
}
