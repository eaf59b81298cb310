//! Text-level checklist parsing.
//!
//! These helpers work directly on the markdown document. A task line looks like
//! `- [ ] description` (open) or `- [x] description` (done).

use std::ops::Range;

/// Marker written in front of an open item.
pub const OPEN_MARKER: &str = "- [ ] ";

/// Marker written in front of a completed item.
pub const DONE_MARKER: &str = "- [x] ";

/// A recognized checkbox line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CheckboxLine<'a> {
    /// Whether the box is ticked
    pub checked: bool,
    /// Byte range of the text between `[` and `]`
    pub box_span: Range<usize>,
    /// Text after the closing bracket, trimmed
    pub description: &'a str,
}

/// Parse one line (without its terminator) as a checkbox item.
///
/// Accepts leading indentation, optional whitespace between `-` and `[`, an
/// interior of whitespace (open) or `x`/`X` (done), and optional whitespace
/// before the description. Lines with an empty description are not tasks.
pub(crate) fn parse_checkbox(line: &str) -> Option<CheckboxLine<'_>> {
    let indent = line.len() - line.trim_start().len();
    let after_dash = line[indent..].strip_prefix('-')?;
    let gap = after_dash.len() - after_dash.trim_start().len();
    let after_open = after_dash[gap..].strip_prefix('[')?;

    let box_start = line.len() - after_open.len();
    let close = after_open.find(']')?;
    let interior = &after_open[..close];

    let checked = match interior.trim() {
        "" => false,
        "x" | "X" => true,
        _ => return None,
    };

    let description = after_open[close + 1..].trim();
    if description.is_empty() {
        return None;
    }

    Some(CheckboxLine {
        checked,
        box_span: box_start..box_start + close,
        description,
    })
}

/// Descriptions of all open items, in document order.
///
/// An empty result means there is nothing left to do.
pub fn parse_open_items(document: &str) -> Vec<String> {
    document
        .lines()
        .filter_map(parse_checkbox)
        .filter(|item| !item.checked)
        .map(|item| item.description.to_string())
        .collect()
}

/// Descriptions of every item, open or done, in document order.
pub fn parse_all_items(document: &str) -> Vec<String> {
    document
        .lines()
        .filter_map(parse_checkbox)
        .map(|item| item.description.to_string())
        .collect()
}

/// The first backtick-quoted token of a description.
pub fn extract_target(description: &str) -> Option<String> {
    let mut rest = description;
    while let Some(open) = rest.find('`') {
        let after = &rest[open + 1..];
        let close = after.find('`')?;
        let token = after[..close].trim();
        if !token.is_empty() {
            return Some(token.to_string());
        }
        // An empty pair: the closing tick may open the next token.
        rest = &after[close..];
    }
    None
}

/// Flip the first `- [ ] {description}` occurrence to `- [x] {description}`.
///
/// Returns the document unchanged when the open form is not found verbatim.
pub fn mark_done(document: &str, description: &str) -> String {
    let open = format!("{}{}", OPEN_MARKER, description);
    let done = format!("{}{}", DONE_MARKER, description);
    document.replacen(&open, &done, 1)
}

/// Remove a leading fence line and a trailing fence line, if present.
///
/// The leading fence may carry a one-word info string (`markdown`, `python`,
/// `html/css`). Anything that does not look like a fence is left alone.
pub fn strip_fence(text: &str) -> &str {
    let mut body = text;

    if let Some(rest) = body.strip_prefix("```") {
        let (info, after) = rest.split_once('\n').unwrap_or((rest, ""));
        if is_info_string(info.trim()) {
            body = after;
        }
    }

    let trimmed = body.trim_end();
    if let Some(rest) = trimmed.strip_suffix("```") {
        if rest.is_empty() {
            body = rest;
        } else if let Some(rest) = rest.strip_suffix('\n') {
            body = rest.strip_suffix('\r').unwrap_or(rest);
        }
    }

    body
}

fn is_info_string(info: &str) -> bool {
    info.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '_' | '.' | '#' | '/'))
}
