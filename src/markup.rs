//! Structural scanning over wiki markup: balanced template blocks and
//! `== Heading ==` sections.

use std::sync::LazyLock;

use regex::Regex;

static INFOBOX_FILM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*[Ii]nfobox film").expect("valid infobox regex"));

/// Returns the end offset (exclusive, after the closing `}}`) of the template
/// opened at `start`, which must point at `{{`.
///
/// Nested `{{ }}` pairs are tracked by depth. Returns `None` when the template
/// is never closed.
pub fn template_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = start;

    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'{', b'{') => {
                depth += 1;
                i += 2;
            }
            (b'}', b'}') => {
                depth = depth.saturating_sub(1);
                i += 2;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => i += 1,
        }
    }

    None
}

/// Body of the template opened at `start`, after `prefix_len` bytes of its
/// opening (e.g. `{{Infobox film`) and before the matching `}}`. An
/// unterminated template runs to the end of the text.
fn template_body(text: &str, start: usize, prefix_len: usize) -> &str {
    let body_start = start + prefix_len;
    let body_end = match template_end(text, start) {
        Some(end) => (end - 2).max(body_start),
        None => text.len(),
    };
    &text[body_start..body_end]
}

/// The parameter block of the first `{{Infobox film ...}}` template, with
/// nested templates kept intact.
pub fn infobox(source: &str) -> Option<&str> {
    let found = INFOBOX_FILM_RE.find(source)?;
    Some(template_body(source, found.start(), found.len()))
}

/// Returns the body of the first template whose name matches `name`
/// (case-insensitive) starting at or after `from`.
pub fn find_template<'a>(text: &'a str, from: usize, name: &str) -> Option<(usize, &'a str)> {
    let pattern = format!(r"(?i)\{{\{{\s*{}\s*", regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    let found = re.find_at(text, from)?;
    Some((found.start(), template_body(text, found.start(), found.len())))
}

/// Locates a level-2 `== Heading ==` line and returns the byte offset just after it.
pub fn heading_end(source: &str, heading: &str) -> Option<usize> {
    let pattern = format!(r"==\s*{}\s*==", regex::escape(heading));
    let re = Regex::new(&pattern).ok()?;
    re.find(source).map(|m| m.end())
}

/// Body of the `== Heading ==` section: from the line after the heading up to
/// the next heading line or the end of the text.
pub fn section<'a>(source: &'a str, heading: &str) -> Option<&'a str> {
    let after = heading_end(source, heading)?;
    let rest = &source[after..];
    let line_start = rest.find('\n')? + 1;
    let body = &rest[line_start..];
    let body_end = body.find("\n==").unwrap_or(body.len());
    Some(&body[..body_end])
}
