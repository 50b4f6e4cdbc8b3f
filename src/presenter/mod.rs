//! Applying a content map to the placeholder locations of a rendered view

mod html_file;

pub use html_file::HtmlFileView;

use crate::model::{ContentMap, RenderMode};

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("View I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("No placeholder tagged '{0}'")]
    UnknownKey(String),
}

/// Seam between the sync logic and the rendering environment.
///
/// Placeholders are locations tagged with a field key. Implementations
/// decide what "content" means for their surface; `Rich` values carry
/// line/paragraph-break markers that must render as structure, `Plain`
/// values are literal text.
pub trait PlaceholderView {
    /// Keys of all tagged placeholders currently present in the view
    fn placeholder_keys(&self) -> Vec<String>;

    /// Current content of the placeholder tagged with `key`
    fn read_content(&self, key: &str) -> Option<String>;

    /// Replace the content of the placeholder tagged with `key`
    fn write_content(&mut self, key: &str, value: &str, mode: RenderMode)
        -> Result<(), ViewError>;

    /// Persist any buffered writes. No-op for immediate-mode views.
    fn commit(&mut self) -> Result<(), ViewError> {
        Ok(())
    }
}

/// Counts for one apply pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    pub updated: usize,
    pub unchanged: usize,
    pub missing: usize,
    pub failed: usize,
}

/// Write each mapped value into its matching placeholder.
///
/// A placeholder whose key has no value and one whose content already equals
/// the value are both no-ops. A failed write is logged and does not stop the
/// pass.
pub fn apply(map: &ContentMap, view: &mut dyn PlaceholderView) -> ApplyStats {
    let mut stats = ApplyStats::default();

    for key in view.placeholder_keys() {
        let Some(field) = map.get(&key) else {
            tracing::debug!(key = %key, "No content for placeholder");
            stats.missing += 1;
            continue;
        };

        if view.read_content(&key).as_deref() == Some(field.value.as_str()) {
            stats.unchanged += 1;
            continue;
        }

        match view.write_content(&key, &field.value, field.mode) {
            Ok(()) => {
                tracing::debug!(key = %key, "Placeholder updated");
                stats.updated += 1;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to write placeholder");
                stats.failed += 1;
            }
        }
    }

    stats
}
