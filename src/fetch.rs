//! HTTP implementation of [`DocumentFetcher`].

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::traits::{DocumentFetcher, FetchError};

const USER_AGENT: &str = concat!("selective-harvester/", env!("CARGO_PKG_VERSION"));

/// Fetches records over HTTP with `reqwest`.
///
/// The body is written to disk whatever the HTTP status. Repositories
/// report protocol errors in the body, sometimes under a 4xx status, and
/// the classifier decides what the bytes mean.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher without a request timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(None)
    }

    /// Creates a fetcher; `timeout` bounds each request when set.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::Request(Box::new(e)))?;
        Ok(Self { client })
    }

    /// Uses a preconfigured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    fn fetcher_id(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(Box::new(e)))?;

        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "HTTP response");

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(Box::new(e)))?;
        tokio::fs::write(dest, &body).await?;
        Ok(())
    }
}
