use anyhow::Context as _;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::app::movie_store::{LocalFsMovieStore, MovieStore, new_movie_id};
use crate::cli::ImportArgs;
use crate::formats::{Knowable, OttReleaseInfo, ReleaseType, StoredMovie};

/// Placeholder used by release feeds for values that are not announced yet.
pub const TO_BE_DECIDED: &str = "TBD";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseFeed {
    #[serde(default)]
    pub theatrical_releases: Vec<FeedEntry>,
    #[serde(default)]
    pub ott_releases: Vec<FeedEntry>,
    #[serde(default)]
    pub past_ott_releases: Vec<FeedEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: String,
    pub release_date: String,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportAction {
    Created,
    Updated,
    Unchanged,
}

impl ImportSummary {
    fn record(&mut self, result: &anyhow::Result<ImportAction>) {
        match result {
            Ok(ImportAction::Created) => self.created += 1,
            Ok(ImportAction::Updated) => self.updated += 1,
            Ok(ImportAction::Unchanged) => self.unchanged += 1,
            Err(_) => self.errors += 1,
        }
    }
}

/// Parses a feed value, mapping the `"TBD"` placeholder (and blanks) to `Unknown`.
pub fn parse_feed_text(value: Option<&str>) -> Knowable<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() && !v.eq_ignore_ascii_case(TO_BE_DECIDED) => {
            Knowable::Known(v.to_owned())
        }
        _ => Knowable::Unknown,
    }
}

/// Parses a feed date (`YYYY-MM-DD`, optionally followed by a time part).
pub fn parse_feed_date(value: &str) -> anyhow::Result<Knowable<NaiveDate>> {
    let Knowable::Known(text) = parse_feed_text(Some(value)) else {
        return Ok(Knowable::Unknown);
    };
    let date_part = text.get(..10).unwrap_or(&text);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Knowable::Known)
        .with_context(|| format!("parse release date: {text:?}"))
}

/// The fields a feed entry owns on the stored record.
#[derive(Debug, Clone, PartialEq)]
struct FeedDetails {
    release_date: Option<NaiveDate>,
    director: Option<String>,
    cast: Vec<String>,
    release_type: ReleaseType,
    platform: Option<String>,
    ott_release: Option<OttReleaseInfo>,
}

fn feed_details(entry: &FeedEntry, release_type: ReleaseType) -> anyhow::Result<FeedDetails> {
    let release_date = parse_feed_date(&entry.release_date)?;
    let platform = parse_feed_text(entry.platform.as_deref());

    let ott_release = (release_type != ReleaseType::Theatrical).then(|| OttReleaseInfo {
        platform: platform.clone(),
        date: release_date,
    });

    Ok(FeedDetails {
        release_date: release_date.into_option(),
        director: entry.director.clone(),
        cast: entry.cast.clone(),
        release_type,
        platform: match release_type {
            ReleaseType::Theatrical => None,
            _ => platform.into_option(),
        },
        ott_release,
    })
}

/// Whether applying `details` would change the stored record. New OTT values
/// that are still unknown never count as a change on their own.
fn has_changes(existing: &StoredMovie, details: &FeedDetails) -> bool {
    if existing.release_date != details.release_date
        || existing.director != details.director
        || existing.cast != details.cast
        || existing.platform != details.platform
    {
        return true;
    }

    match (&details.ott_release, &existing.ott_release) {
        (Some(new), Some(old)) => {
            let date_changed = new.date.is_known() && new.date != old.date;
            let platform_changed = new.platform.is_known() && new.platform != old.platform;
            date_changed || platform_changed
        }
        (None, None) => false,
        _ => true,
    }
}

fn apply(movie: &mut StoredMovie, details: FeedDetails) {
    movie.release_date = details.release_date;
    movie.director = details.director;
    movie.cast = details.cast;
    movie.release_type = Some(details.release_type);
    movie.platform = details.platform;
    if details.ott_release.is_some() {
        movie.ott_release = details.ott_release;
    }
}

pub async fn import_entry(
    store: &dyn MovieStore,
    entry: &FeedEntry,
    release_type: ReleaseType,
) -> anyhow::Result<ImportAction> {
    if entry.title.trim().is_empty() {
        anyhow::bail!("feed entry has an empty title");
    }
    let details = feed_details(entry, release_type)?;

    match store.find_by_title(&entry.title).await? {
        Some(mut existing) => {
            if !has_changes(&existing, &details) {
                return Ok(ImportAction::Unchanged);
            }
            apply(&mut existing, details);
            store.put(&existing).await?;
            Ok(ImportAction::Updated)
        }
        None => {
            let mut movie = StoredMovie {
                id: new_movie_id(),
                title: entry.title.clone(),
                ..StoredMovie::default()
            };
            apply(&mut movie, details);
            store.put(&movie).await?;
            Ok(ImportAction::Created)
        }
    }
}

/// Imports every section of the feed. Failures are counted per entry and do
/// not stop the batch.
pub async fn import_feed(store: &dyn MovieStore, feed: &ReleaseFeed) -> ImportSummary {
    let sections = [
        (ReleaseType::Theatrical, &feed.theatrical_releases),
        (ReleaseType::Ott, &feed.ott_releases),
        (ReleaseType::PastOtt, &feed.past_ott_releases),
    ];

    let mut summary = ImportSummary::default();
    for (release_type, entries) in sections {
        for entry in entries {
            let result = import_entry(store, entry, release_type).await;
            if let Err(err) = &result {
                tracing::warn!(title = %entry.title, ?err, "failed to import feed entry");
            }
            summary.record(&result);
        }
    }

    tracing::info!(
        created = summary.created,
        updated = summary.updated,
        unchanged = summary.unchanged,
        errors = summary.errors,
        "imported release feed"
    );
    summary
}

pub async fn run(args: ImportArgs) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("read feed: {}", args.file))?;
    let feed: ReleaseFeed =
        serde_json::from_slice(&bytes).with_context(|| format!("parse feed: {}", args.file))?;

    let store = LocalFsMovieStore::new(&args.store);
    let summary = import_feed(&store, &feed).await;
    crate::print_json(&summary)
}
