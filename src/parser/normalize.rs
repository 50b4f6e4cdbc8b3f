//! Normalization of captured field values into marker form

/// Marker for a single line break inside a rich value
pub const LINE_BREAK: &str = "<br>";

/// Marker for a paragraph break inside a rich value
pub const PARAGRAPH_BREAK: &str = "<br><br>";

/// Normalize a multiline captured value.
///
/// Line endings are unified to LF and the whole value is trimmed. A blank
/// line (runs collapse) becomes one paragraph-break marker, every remaining
/// line break becomes one line-break marker. Indentation carried over from
/// the source document is stripped per line.
pub fn normalize_multiline(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let trimmed = unified.trim();

    let mut out = String::with_capacity(trimmed.len());
    let mut saw_blank = false;
    for line in trimmed.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            saw_blank = true;
            continue;
        }
        if !out.is_empty() {
            out.push_str(if saw_blank { PARAGRAPH_BREAK } else { LINE_BREAK });
        }
        out.push_str(line);
        saw_blank = false;
    }
    out
}

/// Rejoin a comma-and-space separated list with line-break markers.
///
/// Order is preserved; items are split on the exact `", "` token and not
/// trimmed further.
pub fn join_list(raw: &str) -> String {
    raw.split(", ").collect::<Vec<_>>().join(LINE_BREAK)
}
