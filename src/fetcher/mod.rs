//! Document sources for fetching the raw content text

mod http;

use async_trait::async_trait;

pub use http::HttpDocumentSource;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected status {status} fetching {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}

/// Trait for raw document sources
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the current raw document text
    async fn fetch(&self) -> Result<String, FetchError>;
}
