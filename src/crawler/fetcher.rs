//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building the HTTP client (user agent, browser-like headers, proxy, timeouts)
//! - GET requests for listing and detail pages
//! - Status classification into [`FetchError`] variants
//!
//! There is no retry here. A failed fetch is reported once and the
//! coordinator decides whether it ends the session or just skips an item.

use crate::config::NetworkConfig;
use crate::url::redact_credentials;
use crate::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, Proxy, StatusCode};
use std::time::Duration;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: String,

    /// Page markup
    pub content: String,

    /// When the response was received
    pub fetched_at: DateTime<Utc>,
}

impl FetchedPage {
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
            fetched_at: Utc::now(),
        }
    }
}

/// Page fetching contract consumed by the coordinator
///
/// A fetcher is acquired once per session and closed exactly once when the
/// session ends.
#[async_trait]
pub trait PageFetcher: Send {
    /// Fetches `url`, failing on transport errors and any non-200 status
    async fn fetch(&mut self, url: &str) -> Result<FetchedPage, FetchError>;

    /// Releases the fetcher's resources
    async fn close(&mut self) -> Result<(), FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The network configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client (e.g. malformed proxy URL)
///
/// # Example
///
/// ```no_run
/// use listing_crawler::config::NetworkConfig;
/// use listing_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&NetworkConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &NetworkConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert("upgrade-insecure-requests", HeaderValue::from_static("1"));

    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true);

    match &config.proxy_url {
        Some(proxy_url) => {
            tracing::info!("Using proxy: {}", redact_credentials(proxy_url));
            builder = builder.proxy(Proxy::all(proxy_url.as_str())?);
        }
        None => {
            tracing::info!("No proxy configured, using direct connection");
            builder = builder.no_proxy();
        }
    }

    builder.build()
}

/// reqwest-backed [`PageFetcher`]
pub struct HttpFetcher {
    client: Client,
    closed: bool,
}

impl HttpFetcher {
    /// Builds a fetcher from the network configuration
    pub fn new(config: &NetworkConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    /// Wraps an already configured client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            closed: false,
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&mut self, url: &str) -> Result<FetchedPage, FetchError> {
        if self.closed {
            return Err(FetchError::Closed);
        }

        tracing::debug!("Fetching: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            let message = if e.is_timeout() {
                "request timed out".to_string()
            } else if e.is_connect() {
                "connection failed".to_string()
            } else {
                e.to_string()
            };
            FetchError::NoResponse {
                url: url.to_string(),
                message,
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            match status {
                StatusCode::FORBIDDEN => {
                    tracing::warn!("Access forbidden (403), site may have bot protection: {}", url)
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    tracing::warn!("Rate limited (429): {}", url)
                }
                _ => tracing::warn!("HTTP {}: {}", status, url),
            }
            return Err(FetchError::from_status(url, status.as_u16()));
        }

        let content = response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!("Fetched {} ({} bytes)", url, content.len());

        Ok(FetchedPage {
            url: url.to_string(),
            content,
            fetched_at: Utc::now(),
        })
    }

    async fn close(&mut self) -> Result<(), FetchError> {
        if self.closed {
            return Err(FetchError::Closed);
        }
        self.closed = true;
        tracing::debug!("HTTP fetcher closed");
        Ok(())
    }
}
