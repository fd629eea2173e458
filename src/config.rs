use std::time::Duration;

use url::Url;

pub const DEFAULT_WIKI_BASE_URL: &str = "https://en.wikipedia.org";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct WikiConfig {
    pub base_url: String,
    pub fetch_timeout: Duration,
    pub user_agent: String,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_WIKI_BASE_URL.to_owned(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            user_agent: default_user_agent(),
        }
    }
}

impl WikiConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("FILMWIKI_WIKI_BASE_URL")
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_WIKI_BASE_URL.to_owned());
        let fetch_timeout_secs = std::env::var("FILMWIKI_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);
        let user_agent =
            std::env::var("FILMWIKI_USER_AGENT").unwrap_or_else(|_| default_user_agent());

        Self {
            base_url,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            user_agent,
        }
    }

    /// `{base}/w/rest.php/v1/page/{title}` with the title as one encoded segment.
    pub fn page_endpoint(&self, title: &str) -> anyhow::Result<Url> {
        self.url_with_segments(&["w", "rest.php", "v1", "page", title])
    }

    /// Public article URL for attribution.
    pub fn article_url(&self, title: &str) -> anyhow::Result<Url> {
        self.url_with_segments(&["wiki", title])
    }

    fn url_with_segments(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| anyhow::anyhow!("parse wiki base url {}: {err}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("wiki base url cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn default_user_agent() -> String {
    format!("filmwiki/{}", env!("CARGO_PKG_VERSION"))
}
