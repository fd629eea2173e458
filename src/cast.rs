use std::sync::LazyLock;

use regex::Regex;

use crate::formats::CastEntry;
use crate::markup;
use crate::normalize::normalize_non_blank;

const LINKED_NAME: &str = r"\*\s*\[\[([^\]|]+)(?:\|[^\]]+)?\]\]";

/// Role delimiters, most specific first.
static ROLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\s*as\b\s*([^\n<]+)",
        r"\s*in(?:\s*the)?\s*role\s*of\s*([^\n<]+)",
        r"\s*(?:–|—|-)\s*([^\n<]+)",
    ]
    .iter()
    .map(|suffix| Regex::new(&format!("{LINKED_NAME}{suffix}")).expect("valid cast role regex"))
    .collect()
});
static NAME_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LINKED_NAME).expect("valid cast name regex"));

/// The raw text of the cast section: a `{{cast listing}}` block under the
/// heading if there is one, otherwise the plain section body.
pub fn cast_section(source: &str) -> Option<&str> {
    let after_heading = markup::heading_end(source, "Cast")?;
    if let Some((start, body)) = markup::find_template(source, after_heading, "cast listing")
        && source[after_heading..start].trim().is_empty()
    {
        return Some(body);
    }
    markup::section(source, "Cast")
}

/// Parses the bulleted cast list. Lines that do not start with a linked name
/// are skipped; order and duplicates are preserved.
pub fn extract_cast(source: &str) -> Vec<CastEntry> {
    let Some(section) = cast_section(source) else {
        return Vec::new();
    };

    section
        .lines()
        .filter(|line| line.trim_start().starts_with('*'))
        .filter_map(parse_cast_line)
        .collect()
}

pub fn parse_cast_line(line: &str) -> Option<CastEntry> {
    for pattern in ROLE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(line)
            && let Some(name) = normalize_non_blank(&caps[1])
        {
            return Some(CastEntry {
                name,
                role: normalize_non_blank(&caps[2]),
            });
        }
    }

    let caps = NAME_ONLY.captures(line)?;
    Some(CastEntry {
        name: normalize_non_blank(&caps[1])?,
        role: None,
    })
}
