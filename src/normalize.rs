use std::sync::LazyLock;

use regex::Regex;

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^\]|]+)(?:\|([^\]]*))?\]\]").expect("valid wiki link regex")
});
static SELF_CLOSING_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<ref[^>]*/>").expect("valid self-closing ref regex"));
static REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<ref[^>]*>.*?</ref>").expect("valid ref regex"));
static TEMPLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{.*?\}\}").expect("valid template regex"));
static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid line break regex"));

/// Turns a fragment of wiki markup into display text.
///
/// Steps run in a fixed order: links become their label (or target), references
/// and templates are dropped, line breaks become `", "`, and the result is trimmed.
/// Unbalanced markup is left as-is rather than rejected.
pub fn normalize(text: Option<&str>) -> Option<String> {
    text.map(normalize_str)
}

pub fn normalize_str(text: &str) -> String {
    let text = replace_links(text);
    let text = strip_refs(&text);
    let text = TEMPLATE_RE.replace_all(&text, "");
    let text = LINE_BREAK_RE.replace_all(&text, ", ");
    text.trim().to_owned()
}

/// Normalizes and maps a blank result to `None`.
pub fn normalize_non_blank(text: &str) -> Option<String> {
    let text = normalize_str(text);
    (!text.is_empty()).then_some(text)
}

pub fn replace_links(text: &str) -> String {
    LINK_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            match caps.get(2).map(|m| m.as_str().trim()) {
                Some(label) if !label.is_empty() => label.to_owned(),
                _ => caps[1].trim().to_owned(),
            }
        })
        .into_owned()
}

pub fn split_line_breaks(text: &str) -> impl Iterator<Item = &str> {
    LINE_BREAK_RE.split(text)
}

pub fn strip_refs(text: &str) -> String {
    let text = SELF_CLOSING_REF_RE.replace_all(text, "");
    REF_RE.replace_all(&text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_stays_none() {
        assert_eq!(normalize(None), None);
    }

    #[test]
    fn piped_link_becomes_label() {
        assert_eq!(
            normalize_str("[[S. S. Rajamouli|Rajamouli]] directed it"),
            "Rajamouli directed it"
        );
    }

    #[test]
    fn bare_link_becomes_target() {
        assert_eq!(normalize_str("[[Hyderabad]]"), "Hyderabad");
    }

    #[test]
    fn refs_and_templates_are_dropped() {
        let text = r#"159 minutes<ref name="bbfc">{{cite web|url=x}}</ref> {{efn|cut}}<ref name="r2" />"#;
        assert_eq!(normalize_str(text), "159 minutes");
    }

    #[test]
    fn line_breaks_become_comma_separators() {
        assert_eq!(
            normalize_str(" [[Prabhas]]<br />[[Rana Daggubati]]<br>Anushka "),
            "Prabhas, Rana Daggubati, Anushka"
        );
    }

    #[test]
    fn unterminated_markup_degrades_to_partial_stripping() {
        assert_eq!(normalize_str("Telugu {{lang"), "Telugu {{lang");
        assert_eq!(normalize_str("[[Telugu"), "[[Telugu");
    }
}
