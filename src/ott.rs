use std::sync::LazyLock;

use regex::Regex;

use crate::formats::{Knowable, OttReleaseInfo};
use crate::normalize::normalize_non_blank;

pub const KNOWN_PLATFORMS: [&str; 5] = [
    "Amazon Prime Video",
    "Netflix",
    "Disney+ Hotstar",
    "ZEE5",
    "SonyLIV",
];

static RIGHTS_ACQUIRED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)digital.*?rights.*?(?:acquired by|bought by|sold to)\s*\[\[([^\]|]+)[^\]]*\]\]",
    )
    .expect("valid rights-acquired regex")
});
static PLATFORM_MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = KNOWN_PLATFORMS
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?:{alternatives})")).expect("valid platform mention regex")
});
static SATELLITE_DIGITAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)satellite.*?digital rights.*?\[\[([^\]|]+)[^\]]*\]\]")
        .expect("valid satellite rights regex")
});

/// Finds the streaming platform holding the digital rights.
///
/// Heuristics run in order: an explicit "digital rights acquired by [[X]]"
/// sentence, then any mention of a well-known platform, then a "satellite and
/// digital rights ... [[X]]" sentence. The release date is never known here.
pub fn extract_ott_release(source: &str) -> Option<OttReleaseInfo> {
    let heuristics: [&Regex; 3] = [
        &RIGHTS_ACQUIRED_RE,
        &PLATFORM_MENTION_RE,
        &SATELLITE_DIGITAL_RE,
    ];

    heuristics.iter().find_map(|re| {
        let caps = re.captures(source)?;
        let matched = caps.get(1).or_else(|| caps.get(0))?;
        let platform = normalize_non_blank(matched.as_str())?;
        Some(OttReleaseInfo {
            platform: Knowable::Known(platform),
            date: Knowable::Unknown,
        })
    })
}
