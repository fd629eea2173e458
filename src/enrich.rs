use std::sync::Arc;

use anyhow::Context as _;
use chrono::Utc;

use crate::app::movie_store::{LocalFsMovieStore, MovieStore as _};
use crate::article::scrape_article;
use crate::cli::{FetchArgs, ShowArgs};
use crate::config::WikiConfig;
use crate::formats::{EnrichedMovieRecord, ScrapedMovie, StoredMovie};
use crate::merge::merge_movie;
use crate::source::{ContentSource, WikipediaSource};

/// Fetches an article and runs the extraction pipeline over it.
///
/// Enrichment is best-effort: every failure is logged here and surfaces as
/// `None`, so callers can always fall back to their stored data.
#[derive(Clone)]
pub struct Enricher {
    source: Arc<dyn ContentSource>,
    config: WikiConfig,
}

impl Enricher {
    pub fn new(source: Arc<dyn ContentSource>, config: WikiConfig) -> Self {
        Self { source, config }
    }

    /// An enricher backed by the live wiki described by `config`.
    pub fn online(config: WikiConfig) -> anyhow::Result<Self> {
        let source = WikipediaSource::new(config.clone())?;
        Ok(Self::new(Arc::new(source), config))
    }

    #[tracing::instrument(skip(self))]
    pub async fn enrich(&self, title: &str) -> Option<ScrapedMovie> {
        let article = match self.source.fetch(title).await {
            Ok(Some(article)) => article,
            Ok(None) => {
                tracing::warn!("article not found; skipping enrichment");
                return None;
            }
            Err(err) => {
                tracing::warn!(?err, "article fetch failed; skipping enrichment");
                return None;
            }
        };

        let source_url = match self.config.article_url(&article.title) {
            Ok(url) => url.to_string(),
            Err(err) => {
                tracing::debug!(?err, "could not build article url");
                String::new()
            }
        };

        let movie = scrape_article(&article, source_url);
        tracing::debug!(
            article_title = %article.title,
            cast = movie.cast.len(),
            has_plot = movie.plot.is_some(),
            has_ott_release = movie.ott_release.is_some(),
            "scraped article"
        );
        Some(movie)
    }

    /// Enriches a stored movie by its title and merges, stored values first.
    pub async fn enrich_stored(&self, stored: &StoredMovie) -> EnrichedMovieRecord {
        let scraped = self.enrich(&stored.title).await;
        merge_movie(stored, scraped.as_ref(), Utc::now())
    }
}

pub async fn fetch(args: FetchArgs) -> anyhow::Result<()> {
    let enricher = Enricher::online(WikiConfig::from_env())?;
    let movie = enricher.enrich(&args.title).await;
    crate::print_json(&movie)
}

pub async fn show(args: ShowArgs) -> anyhow::Result<()> {
    let store = LocalFsMovieStore::new(&args.store);
    let stored = store
        .get(&args.id)
        .await?
        .with_context(|| format!("movie not found: {}", args.id))?;

    let record = if args.offline {
        merge_movie(&stored, None, Utc::now())
    } else {
        Enricher::online(WikiConfig::from_env())?
            .enrich_stored(&stored)
            .await
    };
    crate::print_json(&record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::RawArticle;
    use crate::source::StaticSource;
    use async_trait::async_trait;

    struct FailingSource;

    #[async_trait]
    impl ContentSource for FailingSource {
        async fn fetch(&self, _title: &str) -> anyhow::Result<Option<RawArticle>> {
            anyhow::bail!("connection refused")
        }
    }

    fn enricher(source: impl ContentSource + 'static) -> Enricher {
        Enricher::new(Arc::new(source), WikiConfig::default())
    }

    #[tokio::test]
    async fn minimal_article_end_to_end() {
        let source = StaticSource::new(vec![RawArticle {
            title: "Test Movie".to_owned(),
            source: "{{Infobox film|name=Test Movie|language=Telugu}}".to_owned(),
        }]);

        let movie = enricher(source)
            .enrich("Test Movie")
            .await
            .expect("scraped movie");

        assert_eq!(movie.title, "Test Movie");
        assert_eq!(movie.language, "Telugu");
        assert!(movie.cast.is_empty());
        assert_eq!(movie.plot, None);
        assert_eq!(movie.ott_release, None);
        assert_eq!(
            movie.source_url,
            "https://en.wikipedia.org/wiki/Test%20Movie"
        );
    }

    #[tokio::test]
    async fn missing_article_is_none() {
        assert_eq!(enricher(StaticSource::default()).enrich("Nope").await, None);
    }

    #[tokio::test]
    async fn fetch_error_is_none() {
        assert_eq!(enricher(FailingSource).enrich("Anything").await, None);
    }

    #[tokio::test]
    async fn stored_values_survive_failed_enrichment() {
        let stored = StoredMovie {
            id: "m1".to_owned(),
            title: "Offline Movie".to_owned(),
            director: Some("Raj".to_owned()),
            ..StoredMovie::default()
        };

        let record = enricher(FailingSource).enrich_stored(&stored).await;
        assert_eq!(record.title, "Offline Movie");
        assert_eq!(record.director.as_deref(), Some("Raj"));
        assert_eq!(record.source_url, "");
    }

    #[tokio::test]
    async fn tbd_feed_entry_does_not_hide_scraped_platform() -> anyhow::Result<()> {
        use crate::app::movie_store::{LocalFsMovieStore, MovieStore as _};
        use crate::import::{FeedEntry, ReleaseFeed, import_feed};

        let temp = tempfile::TempDir::new()?;
        let store = LocalFsMovieStore::new(temp.path());
        let feed = ReleaseFeed {
            ott_releases: vec![FeedEntry {
                title: "Lucky Baskhar".to_owned(),
                release_date: "TBD".to_owned(),
                platform: Some("TBD".to_owned()),
                ..FeedEntry::default()
            }],
            ..ReleaseFeed::default()
        };
        assert_eq!(import_feed(&store, &feed).await.created, 1);

        let stored = store
            .find_by_title("Lucky Baskhar")
            .await?
            .expect("imported movie");
        let source = StaticSource::new(vec![RawArticle {
            title: "Lucky Baskhar".to_owned(),
            source: "{{Infobox film\n| name = Lucky Baskhar\n}}\n\
The digital streaming rights were acquired by [[Netflix]]."
                .to_owned(),
        }]);

        let record = enricher(source).enrich_stored(&stored).await;
        let ott = record.ott_release.expect("ott release");
        assert_eq!(ott.platform.into_option().as_deref(), Some("Netflix"));
        Ok(())
    }
}
