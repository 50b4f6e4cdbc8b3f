//! Rule-driven extraction of labeled fields from the source document
//!
//! The document format is informal: all-caps section header lines,
//! `- Label: "value"` field lines (the value may span lines up to the
//! closing quote), and optional `===` rule lines terminating a section.
//! Every extraction rule is scoped through its enclosing section, so two
//! fields sharing a label in different sections cannot clobber each other.
//! A missing or malformed field yields no entry for its key; it never
//! aborts the parse.

mod normalize;

pub use normalize::{join_list, normalize_multiline, LINE_BREAK, PARAGRAPH_BREAK};

use regex::Regex;

use crate::model::{ContentMap, FieldValue};

/// How a field's captured value is post-processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text, used verbatim
    Text,
    /// May span lines; normalized into break markers
    Multiline,
    /// Comma-and-space separated items, rejoined with line-break markers
    List,
}

impl FieldKind {
    /// Rich kinds carry structural markers; text stays literal
    fn is_rich(self) -> bool {
        matches!(self, FieldKind::Multiline | FieldKind::List)
    }
}

/// One extraction rule: where to look, what to match, where to put it
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Output key in the content map
    pub key: &'static str,
    /// Enclosing section header, matched case-insensitively
    pub section: &'static str,
    /// Field label as it appears in the document
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn rule(
    key: &'static str,
    section: &'static str,
    label: &'static str,
    kind: FieldKind,
) -> FieldRule {
    FieldRule {
        key,
        section,
        label,
        kind,
    }
}

/// Default field vocabulary
pub const DEFAULT_RULES: &[FieldRule] = &[
    rule("main_title", "HERO", "Main title", FieldKind::Text),
    rule("welcome_text", "HERO", "Welcome text", FieldKind::Text),
    rule("subtitle", "HERO", "Subtitle", FieldKind::Text),
    rule("description", "HERO", "Description", FieldKind::Multiline),
    rule("cta_button", "HERO", "CTA button", FieldKind::Text),
    rule("tagline_title", "TAGLINE", "Title", FieldKind::Text),
    rule("tagline_description", "TAGLINE", "Description", FieldKind::Multiline),
    rule("about_title", "ABOUT PREVIEW", "Title", FieldKind::Text),
    rule("about_description_1", "ABOUT PREVIEW", "Description 1", FieldKind::Multiline),
    rule("about_description_2", "ABOUT PREVIEW", "Description 2", FieldKind::Multiline),
    rule("about_cta_button", "ABOUT PREVIEW", "CTA button", FieldKind::Text),
    rule("base_package", "PARTY PACKAGES", "Base Package", FieldKind::Text),
    rule("package_includes", "PARTY PACKAGES", "Package Includes", FieldKind::List),
];

/// Parser holding the rule table with its compiled field patterns
pub struct ContentParser {
    rules: Vec<(FieldRule, Regex)>,
}

impl ContentParser {
    pub fn new() -> Self {
        Self::with_rules(DEFAULT_RULES)
    }

    pub fn with_rules(rules: &[FieldRule]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|r| (*r, field_pattern(r.label)))
                .collect(),
        }
    }

    /// Extract every rule's field from the raw document text.
    ///
    /// Rules are independent: each one either contributes its key or is
    /// silently absent from the result.
    pub fn parse(&self, text: &str) -> ContentMap {
        let mut map = ContentMap::new();

        for (rule, pattern) in &self.rules {
            let Some(section) = extract_section(text, rule.section) else {
                tracing::debug!(
                    section = rule.section,
                    key = rule.key,
                    "Section not present, field absent"
                );
                continue;
            };

            let Some(raw) = capture_field(pattern, section) else {
                tracing::debug!(
                    section = rule.section,
                    label = rule.label,
                    key = rule.key,
                    "Field not present in section"
                );
                continue;
            };

            let value = match rule.kind {
                FieldKind::Text => raw,
                FieldKind::Multiline => normalize_multiline(&raw),
                FieldKind::List => join_list(&raw),
            };

            let field = if rule.kind.is_rich() {
                FieldValue::rich(value)
            } else {
                FieldValue::plain(value)
            };
            map.insert(rule.key, field);
        }

        tracing::debug!(fields = map.len(), "Parsed content document");
        map
    }
}

impl Default for ContentParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Locate the body of the section headed by `name` (case-insensitive).
///
/// The body runs from the line after the header to the next all-caps header
/// line, a rule of three-or-more `=`, or end of input. Returns `None` when
/// no such header exists.
pub fn extract_section<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let mut offset = 0;
    let mut body_start = None;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let trimmed = line.trim();

        match body_start {
            None => {
                if trimmed.eq_ignore_ascii_case(name) {
                    body_start = Some(offset);
                }
            }
            Some(start) => {
                if is_rule_line(trimmed) || is_section_header(trimmed) {
                    return Some(&text[start..line_start]);
                }
            }
        }
    }

    body_start.map(|start| &text[start..])
}

/// Extract the first `- <label>: "<value>"` field in a text region.
///
/// The value is captured non-greedily up to the closing quote and may span
/// newlines; the result is trimmed. Returns `None` when the field is absent
/// or malformed (no closing quote).
pub fn extract_field(region: &str, label: &str) -> Option<String> {
    capture_field(&field_pattern(label), region)
}

/// As [`extract_field`], with multiline normalization applied
pub fn extract_multiline_field(region: &str, label: &str) -> Option<String> {
    extract_field(region, label).map(|v| normalize_multiline(&v))
}

fn capture_field(pattern: &Regex, region: &str) -> Option<String> {
    pattern
        .captures(region)
        .map(|c| c[1].trim().to_string())
}

fn field_pattern(label: &str) -> Regex {
    // (?m) anchors at line starts, (?s) lets the capture cross newlines
    Regex::new(&format!(
        r#"(?ms)^\s*-\s*{}:\s*"(.*?)""#,
        regex::escape(label)
    ))
    .expect("escaped label always yields a valid pattern")
}

/// A rule line of three-or-more `=` terminates a section
fn is_rule_line(trimmed: &str) -> bool {
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '=')
}

/// An all-caps label line opens the next section.
///
/// Field lines start with `-` and are never headers, even when their text
/// has no lowercase letters.
fn is_section_header(trimmed: &str) -> bool {
    !trimmed.is_empty()
        && !trimmed.starts_with('-')
        && !is_rule_line(trimmed)
        && trimmed.chars().any(|c| c.is_ascii_uppercase())
        && !trimmed.chars().any(|c| c.is_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RenderMode;

    const DOC: &str = r#"HERO
- Main title: "Little Playroom Cafe"
- Welcome text: "Welcome to"
- Subtitle: "Madison's premier indoor playground"
- Description: "A place to play.

A place to grow."
- CTA button: "Book Now"

TAGLINE
- Title: "Play all day"
- Description: "Coffee for the grown-ups"
===

ABOUT PREVIEW
- Title: "Who we are"
- Description 1: "Founded by parents."
- Description 2: "Run by parents."
- CTA button: "Learn More"

PARTY PACKAGES
- Base Package: "$350 for 2 hours"
- Package Includes: "Cake, Balloons, Juice"
"#;

    #[test]
    fn test_extract_section_bounds() {
        let hero = extract_section(DOC, "hero").unwrap();
        assert!(hero.contains("Main title"));
        assert!(!hero.contains("TAGLINE"));
        assert!(!hero.contains("Play all day"));
    }

    #[test]
    fn test_extract_section_missing() {
        assert!(extract_section(DOC, "FOOTER").is_none());
    }

    #[test]
    fn test_section_ends_at_rule_line() {
        let tagline = extract_section(DOC, "TAGLINE").unwrap();
        assert!(tagline.contains("Coffee"));
        assert!(!tagline.contains("==="));
        assert!(!tagline.contains("Who we are"));
    }

    #[test]
    fn test_section_runs_to_end_of_input() {
        let party = extract_section(DOC, "party packages").unwrap();
        assert!(party.contains("Package Includes"));
    }

    #[test]
    fn test_extract_field_trims() {
        let region = r#"- Subtitle: "  spaced out  ""#;
        assert_eq!(extract_field(region, "Subtitle").unwrap(), "spaced out");
    }

    #[test]
    fn test_extract_field_unterminated_quote_is_absent() {
        let region = r#"- Subtitle: "never closed"#;
        assert!(extract_field(region, "Subtitle").is_none());
    }

    #[test]
    fn test_extract_field_missing_label_is_absent() {
        assert!(extract_field(DOC, "Nonexistent").is_none());
    }

    #[test]
    fn test_extract_multiline_field_markers() {
        let hero = extract_section(DOC, "HERO").unwrap();
        let desc = extract_multiline_field(hero, "Description").unwrap();
        assert_eq!(desc, "A place to play.<br><br>A place to grow.");
    }

    #[test]
    fn test_parse_full_document() {
        let map = ContentParser::new().parse(DOC);

        assert_eq!(map.get("main_title").unwrap().value, "Little Playroom Cafe");
        assert_eq!(map.get("cta_button").unwrap().value, "Book Now");
        assert_eq!(map.get("tagline_title").unwrap().value, "Play all day");
        assert_eq!(map.get("about_cta_button").unwrap().value, "Learn More");
        assert_eq!(map.get("base_package").unwrap().value, "$350 for 2 hours");
        assert_eq!(
            map.get("package_includes").unwrap().value,
            "Cake<br>Balloons<br>Juice"
        );
    }

    #[test]
    fn test_parse_scopes_shared_labels() {
        // Three sections carry a "Description"-family label; each lands in
        // its own key instead of first-match-wins.
        let map = ContentParser::new().parse(DOC);

        assert_eq!(
            map.get("description").unwrap().value,
            "A place to play.<br><br>A place to grow."
        );
        assert_eq!(
            map.get("tagline_description").unwrap().value,
            "Coffee for the grown-ups"
        );
        assert_eq!(map.get("about_title").unwrap().value, "Who we are");
        assert_eq!(map.get("tagline_title").unwrap().value, "Play all day");
    }

    #[test]
    fn test_parse_render_modes() {
        let map = ContentParser::new().parse(DOC);

        assert_eq!(map.get("main_title").unwrap().mode, RenderMode::Plain);
        assert_eq!(map.get("description").unwrap().mode, RenderMode::Rich);
        assert_eq!(map.get("package_includes").unwrap().mode, RenderMode::Rich);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parser = ContentParser::new();
        assert_eq!(parser.parse(DOC), parser.parse(DOC));
    }

    #[test]
    fn test_missing_section_drops_all_its_fields() {
        let doc = r#"HERO
- Main title: "Title only"
"#;
        let map = ContentParser::new().parse(doc);
        assert!(map.contains_key("main_title"));
        assert!(!map.contains_key("about_title"));
        assert!(!map.contains_key("tagline_description"));
    }

    #[test]
    fn test_empty_document_yields_empty_map() {
        assert!(ContentParser::new().parse("").is_empty());
    }
}
