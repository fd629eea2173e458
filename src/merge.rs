use chrono::{DateTime, SecondsFormat, Utc};

use crate::article::DEFAULT_LANGUAGE;
use crate::formats::{
    CastEntry, EnrichedMovieRecord, LatestUpdate, License, ScrapedMovie, StoredMovie,
};

pub const DEFAULT_RUNTIME: &str = "Unknown";
pub const DEFAULT_COUNTRY: &str = "India";
pub const LICENSE_URL: &str = "https://creativecommons.org/licenses/by-sa/4.0/deed.en";
pub const LICENSE_TITLE: &str = "Creative Commons Attribution-Share Alike 4.0";

fn stored_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn stored_list(value: &[String]) -> Option<Vec<String>> {
    (!value.is_empty()).then(|| value.to_vec())
}

fn strip_whitespace(value: &str) -> String {
    value.split_whitespace().collect()
}

/// Merges a stored movie with scraped data. For every field the stored value
/// wins, then the scraped one, then a fixed default. Blank strings, empty
/// lists and an OTT release with nothing known in the stored record count as
/// missing.
pub fn merge_movie(
    stored: &StoredMovie,
    scraped: Option<&ScrapedMovie>,
    now: DateTime<Utc>,
) -> EnrichedMovieRecord {
    let key = stored_text(&stored.key).unwrap_or_else(|| {
        stored
            .title
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
    });

    let cast = if stored.cast.is_empty() {
        scraped.map(|movie| movie.cast.clone()).unwrap_or_default()
    } else {
        stored
            .cast
            .iter()
            .map(|name| CastEntry {
                name: name.clone(),
                role: None,
            })
            .collect()
    };

    EnrichedMovieRecord {
        id: stored.id.clone(),
        key,
        title: stored.title.clone(),
        release_date: stored.release_date,
        release_type: stored.release_type.unwrap_or_default(),
        language: stored_text(&stored.language)
            .or_else(|| scraped.map(|movie| strip_whitespace(&movie.language)))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()),
        runtime: stored_text(&stored.runtime)
            .or_else(|| scraped.and_then(|m| m.runtime.clone()))
            .unwrap_or_else(|| DEFAULT_RUNTIME.to_owned()),
        country: stored_text(&stored.country).unwrap_or_else(|| DEFAULT_COUNTRY.to_owned()),
        director: stored_text(&stored.director)
            .or_else(|| scraped.and_then(|m| m.director.clone())),
        writer: stored_list(&stored.writer)
            .or_else(|| scraped.map(|movie| movie.writer.clone()))
            .unwrap_or_default(),
        producer: scraped.and_then(|m| m.producer.clone()),
        production_company: stored_text(&stored.production_company)
            .or_else(|| scraped.and_then(|m| m.production_company.clone())),
        cinematography: scraped.and_then(|m| m.cinematography.clone()),
        editing: stored_text(&stored.editing)
            .or_else(|| scraped.and_then(|m| m.editing.clone())),
        music: stored_text(&stored.music)
            .or_else(|| scraped.and_then(|m| m.music.clone())),
        budget: stored_text(&stored.budget)
            .or_else(|| scraped.and_then(|m| m.budget.clone())),
        box_office: stored_text(&stored.box_office)
            .or_else(|| scraped.and_then(|m| m.box_office.clone())),
        cast,
        filming_locations: stored_list(&stored.filming_locations)
            .or_else(|| scraped.map(|movie| movie.filming_locations.clone()))
            .unwrap_or_default(),
        plot: stored_text(&stored.plot).or_else(|| scraped.and_then(|m| m.plot.clone())),
        ott_release: stored
            .ott_release
            .clone()
            .filter(|ott| ott.platform.is_known() || ott.date.is_known())
            .or_else(|| scraped.and_then(|movie| movie.ott_release.clone())),
        image_url: stored_text(&stored.image_url).unwrap_or_default(),
        license: License {
            url: LICENSE_URL.to_owned(),
            title: LICENSE_TITLE.to_owned(),
        },
        source_url: scraped
            .map(|movie| movie.source_url.clone())
            .unwrap_or_default(),
        latest_update: LatestUpdate {
            id: now.timestamp_millis().to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        },
    }
}
