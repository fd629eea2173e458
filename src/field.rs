use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use regex::Regex;

use crate::normalize::{normalize_non_blank, split_line_breaks, strip_refs};

/// Value of a parameter that may contain whole links or templates whose own
/// `|` separators must not end the match.
const LINK_AWARE_VALUE: &str = r"(?:\[\[[^\]\n]*\]\]|\{\{[^}\n]*\}\}|[^\n|])+";

/// An ordered list of `(pattern, capture group)` pairs for one semantic field.
/// Patterns are tried in order and the first one that matches wins, so the
/// most specific encodings go first.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    patterns: Vec<(Regex, usize)>,
}

impl ExtractionRule {
    pub fn new(patterns: Vec<(Regex, usize)>) -> Self {
        Self { patterns }
    }

    /// Builds a rule from pattern templates where `{field}` is replaced by the
    /// escaped parameter name.
    pub fn from_templates(field: &str, templates: &[(&str, usize)]) -> anyhow::Result<Self> {
        let escaped = regex::escape(field);
        let patterns = templates
            .iter()
            .map(|(template, group)| {
                let pattern = template.replace("{field}", &escaped);
                Regex::new(&pattern)
                    .map(|re| (re, *group))
                    .map_err(|err| anyhow::anyhow!("compile pattern for {field}: {err}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self::new(patterns))
    }

    /// Standard rule for an infobox parameter.
    pub fn for_field(field: &str) -> anyhow::Result<Self> {
        let generic = format!(r"\|\s*{{field}}\s*=\s*({LINK_AWARE_VALUE})");
        Self::from_templates(
            field,
            &[
                (r"\|\s*{field}\s*=\s*\{\{INR\|((?:\{\{[^{}]*\}\}|[^{}])+)\}\}", 1),
                (
                    r"\|\s*{field}\s*=\s*\{\{\s*(?i:plainlist|ubl|unbulleted list)\s*\|((?:\{\{[^{}]*\}\}|[^{}])*)\}\}",
                    1,
                ),
                (r"\|\s*{field}\s*=\s*(\[\[[^\]]+\]\])[ \t]*(?:\n|\||\}|$)", 1),
                (generic.as_str(), 1),
                (r"\|\s*{field}\s*=\s*([^\n}|]*(?:\n[^\n}|]+)*)", 1),
            ],
        )
    }

    /// Every capture in rule order, regardless of content.
    pub fn captures<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.patterns.iter().filter_map(move |(re, group)| {
            re.captures(source)
                .and_then(|caps| caps.get(*group))
                .map(|m| m.as_str())
        })
    }

    /// First capture that survives `post` (a `None` from `post` means "keep
    /// looking").
    pub fn first_match<F>(&self, source: &str, mut post: F) -> Option<String>
    where
        F: FnMut(&str) -> Option<String>,
    {
        self.captures(source).find_map(|raw| post(raw))
    }
}

/// Compiled rules keyed by `(kind, field)`, built on first use.
#[derive(Debug, Default)]
pub struct RuleCache {
    rules: Mutex<HashMap<(&'static str, String), Arc<ExtractionRule>>>,
}

impl RuleCache {
    pub fn get_or_build<F>(
        &self,
        kind: &'static str,
        field: &str,
        build: F,
    ) -> anyhow::Result<Arc<ExtractionRule>>
    where
        F: FnOnce(&str) -> anyhow::Result<ExtractionRule>,
    {
        let mut rules = self.rules.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(rule) = rules.get(&(kind, field.to_owned())) {
            return Ok(Arc::clone(rule));
        }
        let rule = Arc::new(build(field)?);
        rules.insert((kind, field.to_owned()), Arc::clone(&rule));
        Ok(rule)
    }
}

pub(crate) static RULES: LazyLock<RuleCache> = LazyLock::new(RuleCache::default);

static RUNTIME_RULE: LazyLock<ExtractionRule> = LazyLock::new(|| {
    ExtractionRule::from_templates("runtime", &[(r"\|\s*{field}\s*=[ \t]*([^\n<]+)", 1)])
        .expect("valid runtime rule")
});

/// Normalizes one captured value. Bulleted lines (from `{{plainlist}}`)
/// become a comma-separated list; a dangling `{{name` fragment left by a
/// template that spans lines counts as blank.
fn normalize_value(raw: &str) -> Option<String> {
    let items: Vec<String> = raw
        .lines()
        .filter_map(|line| line.trim().strip_prefix('*'))
        .filter_map(normalize_non_blank)
        .collect();
    if !items.is_empty() {
        return Some(items.join(", "));
    }

    let value = normalize_non_blank(raw)?;
    (!value.contains("{{")).then_some(value)
}

/// Extracts `| field = value` from infobox markup and normalizes it.
///
/// Returns `None` when no pattern matches or every match normalizes to blank.
pub fn extract_field(source: &str, field: &str) -> Option<String> {
    let rule = RULES
        .get_or_build("field", field, ExtractionRule::for_field)
        .ok()?;
    rule.first_match(source, normalize_value)
}

/// `| runtime = ...` up to the end of the line or the first tag. A blank
/// parameter never borrows the next line.
pub fn extract_runtime(source: &str) -> Option<String> {
    RUNTIME_RULE.first_match(source, |raw| {
        let runtime = strip_refs(raw).trim().to_owned();
        (!runtime.is_empty()).then_some(runtime)
    })
}

fn list_rule(field: &str) -> anyhow::Result<ExtractionRule> {
    ExtractionRule::from_templates(
        field,
        &[(r"\|\s*{field}\s*=\s*((?:\[\[[^\]]*\]\]|[^}|])*)", 1)],
    )
}

/// `| field = a<br />b<br />c` as a list, following the value across lines
/// until the next parameter or the end of the template.
pub fn extract_list(source: &str, field: &str) -> Vec<String> {
    let Ok(rule) = RULES.get_or_build("list", field, list_rule) else {
        return Vec::new();
    };
    let Some(raw) = rule.captures(source).next() else {
        return Vec::new();
    };

    split_line_breaks(raw)
        .filter_map(normalize_non_blank)
        .collect()
}
