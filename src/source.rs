use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, USER_AGENT};

use crate::config::WikiConfig;
use crate::formats::RawArticle;

/// Where raw article markup comes from.
///
/// `Ok(None)` means the title does not exist; `Err` is a transport or decoding
/// failure.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, title: &str) -> anyhow::Result<Option<RawArticle>>;
}

/// The MediaWiki REST page endpoint.
#[derive(Debug, Clone)]
pub struct WikipediaSource {
    client: reqwest::Client,
    config: WikiConfig,
}

impl WikipediaSource {
    pub fn new(config: WikiConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build wiki http client")?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ContentSource for WikipediaSource {
    async fn fetch(&self, title: &str) -> anyhow::Result<Option<RawArticle>> {
        let endpoint = self.config.page_endpoint(title)?;

        let response = self
            .client
            .get(endpoint.clone())
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("GET {endpoint}"))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            anyhow::bail!("content API error ({status}) for {endpoint}");
        }

        let article: RawArticle = response
            .json()
            .await
            .with_context(|| format!("parse page response: {endpoint}"))?;
        if article.source.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(article))
    }
}

/// Serves a fixed set of articles from memory, matched by exact title.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    articles: Vec<RawArticle>,
}

impl StaticSource {
    pub fn new(articles: Vec<RawArticle>) -> Self {
        Self { articles }
    }
}

#[async_trait]
impl ContentSource for StaticSource {
    async fn fetch(&self, title: &str) -> anyhow::Result<Option<RawArticle>> {
        Ok(self
            .articles
            .iter()
            .find(|article| article.title == title)
            .cloned())
    }
}
