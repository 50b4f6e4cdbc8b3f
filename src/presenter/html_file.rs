//! Placeholder view backed by a static HTML page on disk
//!
//! Placeholders are elements carrying a `data-content="<key>"` attribute.
//! Only the element body is spliced; attributes and surrounding markup are
//! left as-is. Assumes the tagged elements do not nest children of their own
//! tag name, which holds for the leaf spans/headings this view targets.

use std::fs;
use std::path::PathBuf;

use regex::Regex;

use super::{PlaceholderView, ViewError};
use crate::model::RenderMode;

pub struct HtmlFileView {
    path: PathBuf,
    html: String,
    key_pattern: Regex,
    dirty: bool,
}

impl HtmlFileView {
    /// Load the page from disk
    pub fn open(path: PathBuf) -> Result<Self, ViewError> {
        let html = fs::read_to_string(&path)?;
        tracing::debug!(path = %path.display(), len = html.len(), "Loaded page");
        Ok(Self {
            path,
            html,
            key_pattern: Regex::new(r#"\bdata-content="([^"]+)""#).unwrap(),
            dirty: false,
        })
    }

    /// Byte range of the body of the first element tagged with `key`
    fn body_range(&self, key: &str) -> Option<(usize, usize)> {
        let open_pattern = Regex::new(&format!(
            r#"<([A-Za-z][A-Za-z0-9-]*)\b[^>]*\bdata-content="{}"[^>]*>"#,
            regex::escape(key)
        ))
        .expect("escaped key always yields a valid pattern");

        let captures = open_pattern.captures(&self.html)?;
        let open = captures.get(0)?;
        let tag = captures.get(1)?.as_str();

        let body_start = open.end();
        let close = format!("</{}>", tag);
        let body_end = body_start + self.html[body_start..].find(&close)?;
        Some((body_start, body_end))
    }
}

impl PlaceholderView for HtmlFileView {
    fn placeholder_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .key_pattern
            .captures_iter(&self.html)
            .map(|c| c[1].to_string())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    fn read_content(&self, key: &str) -> Option<String> {
        self.body_range(key)
            .map(|(start, end)| unescape(&self.html[start..end]))
    }

    fn write_content(
        &mut self,
        key: &str,
        value: &str,
        mode: RenderMode,
    ) -> Result<(), ViewError> {
        let (start, end) = self
            .body_range(key)
            .ok_or_else(|| ViewError::UnknownKey(key.to_string()))?;

        // Rich values carry their own markup (the break markers); plain
        // values must stay literal text.
        let encoded = match mode {
            RenderMode::Rich => value.to_string(),
            RenderMode::Plain => escape(value),
        };

        self.html.replace_range(start..end, &encoded);
        self.dirty = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), ViewError> {
        if !self.dirty {
            return Ok(());
        }
        fs::write(&self.path, &self.html)?;
        self.dirty = false;
        tracing::debug!(path = %self.path.display(), "Page written");
        Ok(())
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
