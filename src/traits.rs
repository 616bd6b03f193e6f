use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(Box<dyn std::error::Error + Send + Sync>),
    #[error("Invalid repository URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Short name used in log lines (e.g., "http").
    fn fetcher_id(&self) -> &str;

    /// Retrieves `url` and writes the raw response body to `dest`.
    ///
    /// Nothing is parsed here; the caller classifies the bytes once they are
    /// on disk. A partially written `dest` may remain on error.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}
