use std::sync::LazyLock;

use regex::Regex;

use crate::field::{ExtractionRule, RULES};
use crate::normalize::{replace_links, strip_refs};

pub const RUPEE: &str = "₹";
pub const EN_DASH: &str = "–";

static NDASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\{\{\s*ndash\s*\}\}").expect("valid ndash regex"));
static INR_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{INR\|?|\}\}").expect("valid INR marker regex"));

fn money_rule(field: &str) -> anyhow::Result<ExtractionRule> {
    ExtractionRule::from_templates(
        field,
        &[
            (r"\|\s*{field}\s*=\s*\{\{INR\|((?:\{\{[^{}]*\}\}|[^{}])+)\}\}", 1),
            (r"\|\s*{field}\s*=\s*₹([^\n|]+)", 1),
            (r"\|\s*{field}\s*=[ \t]*([^\n|]+)(?:\n|\|)", 1),
        ],
    )
}

/// Extracts a currency field (`budget`, `gross`) as a display string such as
/// `₹180 crore` or `₹120–150 crore`.
///
/// Figures are in crore rupees unless the text already names a unit or is a
/// range, so the suffix is only added when neither is present.
pub fn extract_money(source: &str, field: &str) -> Option<String> {
    let rule = RULES.get_or_build("money", field, money_rule).ok()?;
    rule.first_match(source, canonical_amount)
}

fn canonical_amount(raw: &str) -> Option<String> {
    let value = strip_refs(raw);
    let value = NDASH_RE.replace_all(&value, EN_DASH);
    let value = INR_MARKER_RE.replace_all(&value, "");
    let value = replace_links(&value);
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let mut value = if value.contains(RUPEE) {
        value.to_owned()
    } else {
        format!("{RUPEE}{value}")
    };

    if !value.to_lowercase().contains("crore") && !value.contains(EN_DASH) {
        value.push_str(" crore");
    }

    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_amount_is_none() {
        assert_eq!(extract_money("| budget =\n| gross = 90\n", "budget"), None);
        assert_eq!(
            extract_money("| budget =\n| gross = 90\n", "gross").as_deref(),
            Some("₹90 crore")
        );
    }

    #[test]
    fn bare_number_gets_symbol_and_unit() {
        assert_eq!(
            extract_money("| budget = 50\n", "budget").as_deref(),
            Some("₹50 crore")
        );
    }

    #[test]
    fn symbol_and_range_are_not_duplicated() {
        assert_eq!(
            extract_money("| gross = ₹120–150 crore\n", "gross").as_deref(),
            Some("₹120–150 crore")
        );
    }

    #[test]
    fn inr_template_with_nested_ndash() {
        let source = "| gross = {{INR|1,200{{ndash}}1,300}}<ref>{{cite news|x}}</ref>\n";
        assert_eq!(
            extract_money(source, "gross").as_deref(),
            Some("₹1,200–1,300")
        );
    }

    #[test]
    fn inr_template_beats_later_bare_value() {
        let source = "| budget = {{INR|180 [[crore]]}}\n| budget = 999\n";
        assert_eq!(
            extract_money(source, "budget").as_deref(),
            Some("₹180 crore")
        );
    }

    #[test]
    fn unit_check_is_case_insensitive() {
        assert_eq!(
            extract_money("| budget = 75 Crore\n", "budget").as_deref(),
            Some("₹75 Crore")
        );
    }

    #[test]
    fn value_at_end_of_text_without_terminator_is_ignored() {
        assert_eq!(extract_money("| budget = 50", "budget"), None);
    }

    #[test]
    fn missing_field_is_none() {
        assert_eq!(extract_money("| name = X\n", "budget"), None);
    }
}
