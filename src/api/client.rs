//! HTTP transport for API requests

use reqwest::Client;
use std::error::Error as StdError;
use thiserror::Error;
use tracing::debug;

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A request that failed before producing a response
#[derive(Debug, Error)]
#[error("request failed: {source}")]
pub struct FetchError {
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl FetchError {
    pub fn new(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Performs HTTP GET requests
pub trait HttpFetch: Send + Sync {
    /// Fetches `url`; any HTTP status is a successful fetch
    fn fetch(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<HttpResponse, FetchError>> + Send;
}

/// `HttpFetch` backed by a shared reqwest client
#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fetcher with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl HttpFetch for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let response = self.client.get(url).send().await.map_err(FetchError::new)?;
        let status = response.status().as_u16();
        debug!("{} responded with {}", response.url().path(), status);
        let body = response.text().await.map_err(FetchError::new)?;
        Ok(HttpResponse { status, body })
    }
}
