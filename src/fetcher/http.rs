//! HTTP document source with cache-defeating requests

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use url::Url;

use super::{DocumentSource, FetchError};

const USER_AGENT: &str = concat!("content-sync/", env!("CARGO_PKG_VERSION"));

/// Fetches the document from a fixed URL, bypassing caches
pub struct HttpDocumentSource {
    client: Client,
    url: Url,
}

impl HttpDocumentSource {
    pub fn new(url: Url) -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            url,
        }
    }

    /// The configured URL with a fresh cache-busting query pair appended
    fn request_url(&self) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("t", &Utc::now().timestamp_millis().to_string());
        url
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        let url = self.request_url();
        tracing::debug!(url = %url, "Fetching content document");

        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status(),
                url: self.url.to_string(),
            });
        }

        let text = response.text().await?;
        tracing::debug!(len = text.len(), "Content document fetched");
        Ok(text)
    }
}
