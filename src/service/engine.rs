//! One fetch → parse → present cycle

use crate::fetcher::{DocumentSource, FetchError};
use crate::model::ContentMap;
use crate::parser::ContentParser;
use crate::presenter::{self, ApplyStats, PlaceholderView, ViewError};

#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("View failed: {0}")]
    View(#[from] ViewError),
}

/// Runs cycles against one source and one view, holding the mapping from
/// the last successful parse.
pub struct SyncEngine<S, V> {
    source: S,
    parser: ContentParser,
    view: V,
    last: Option<ContentMap>,
}

impl<S: DocumentSource, V: PlaceholderView> SyncEngine<S, V> {
    pub fn new(source: S, parser: ContentParser, view: V) -> Self {
        Self {
            source,
            parser,
            view,
            last: None,
        }
    }

    /// Fetch the document, parse it, and apply the mapping to the view.
    ///
    /// On failure the last-good mapping is left untouched; on success it is
    /// replaced wholesale, never merged.
    pub async fn run_cycle(&mut self) -> Result<ApplyStats, CycleError> {
        let text = self.source.fetch().await?;
        let map = self.parser.parse(&text);

        let stats = presenter::apply(&map, &mut self.view);
        self.view.commit()?;

        self.last = Some(map);
        Ok(stats)
    }

    /// Mapping from the last successful cycle, if any
    pub fn last_map(&self) -> Option<&ContentMap> {
        self.last.as_ref()
    }
}
