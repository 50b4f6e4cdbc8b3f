//! Application wiring
//!
//! Builds the engine from configuration and owns the scheduler lifecycle.

use crate::fetcher::HttpDocumentSource;
use crate::model::Config;
use crate::parser::ContentParser;
use crate::presenter::{HtmlFileView, ViewError};
use crate::service::{RefreshScheduler, SyncEngine};

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to open page '{path}': {source}")]
    PageOpen {
        path: String,
        #[source]
        source: ViewError,
    },
}

pub struct App {
    scheduler: RefreshScheduler<HttpDocumentSource, HtmlFileView>,
}

impl App {
    /// Build the source, parser, and view, and wire them into a scheduler
    pub fn new(config: Config) -> Result<Self, AppError> {
        let source = HttpDocumentSource::new(config.document_url.clone());
        let view = HtmlFileView::open(config.page_path.clone()).map_err(|e| AppError::PageOpen {
            path: config.page_path.display().to_string(),
            source: e,
        })?;

        let engine = SyncEngine::new(source, ContentParser::new(), view);
        let scheduler = RefreshScheduler::new(engine, config.refresh_period());

        tracing::info!(
            url = %config.document_url,
            page = %config.page_path.display(),
            period_ms = config.refresh_period_ms,
            "Content sync configured"
        );

        Ok(Self { scheduler })
    }

    /// Start refreshing in the background
    pub fn start(&mut self) {
        self.scheduler.start();
    }

    /// Stop refreshing; a cycle in flight runs to completion
    pub async fn stop(&mut self) {
        self.scheduler.stop().await;
    }
}
