use std::path::{Path, PathBuf};

use anyhow::Context as _;
use async_trait::async_trait;
use tokio::fs;

use crate::formats::StoredMovie;

#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn get(&self, id: &str) -> anyhow::Result<Option<StoredMovie>>;
    async fn list(&self) -> anyhow::Result<Vec<StoredMovie>>;
    async fn find_by_title(&self, title: &str) -> anyhow::Result<Option<StoredMovie>>;
    async fn put(&self, movie: &StoredMovie) -> anyhow::Result<()>;
    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, id: &str) -> anyhow::Result<bool>;
}

/// One pretty-printed JSON document per movie under `<base>/movies/<id>.json`.
#[derive(Debug, Clone)]
pub struct LocalFsMovieStore {
    base_dir: PathBuf,
}

impl LocalFsMovieStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn movies_dir(&self) -> PathBuf {
        self.base_dir.join("movies")
    }

    fn movie_json_path(&self, id: &str) -> anyhow::Result<PathBuf> {
        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            anyhow::bail!("invalid movie id: {id:?}");
        }
        Ok(self.movies_dir().join(format!("{id}.json")))
    }
}

pub fn new_movie_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl MovieStore for LocalFsMovieStore {
    async fn get(&self, id: &str) -> anyhow::Result<Option<StoredMovie>> {
        let path = self.movie_json_path(id)?;
        read_movie(&path)
            .await
            .with_context(|| format!("read: {}", path.display()))
    }

    async fn list(&self) -> anyhow::Result<Vec<StoredMovie>> {
        let dir = self.movies_dir();
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("read movies dir: {}", dir.display()));
            }
        };

        let mut movies = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("read movies dir entry: {}", dir.display()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(movie) = read_movie(&path)
                .await
                .with_context(|| format!("read: {}", path.display()))?
            {
                movies.push(movie);
            }
        }

        movies.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        Ok(movies)
    }

    async fn find_by_title(&self, title: &str) -> anyhow::Result<Option<StoredMovie>> {
        let movies = self.list().await?;
        Ok(movies.into_iter().find(|movie| movie.title == title))
    }

    async fn put(&self, movie: &StoredMovie) -> anyhow::Result<()> {
        let path = self.movie_json_path(&movie.id)?;
        write_movie_atomic(&path, movie)
            .await
            .with_context(|| format!("write movie: {}", path.display()))
    }

    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let path = self.movie_json_path(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).with_context(|| format!("delete: {}", path.display())),
        }
    }
}

async fn read_movie(path: &Path) -> anyhow::Result<Option<StoredMovie>> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let movie = serde_json::from_slice(&bytes).context("parse movie json")?;
    Ok(Some(movie))
}

/// Writes to a sibling temp file first so readers never see a half-written movie.
async fn write_movie_atomic(path: &Path, movie: &StoredMovie) -> anyhow::Result<()> {
    let movies_dir = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("movie path has no parent: {}", path.display()))?;
    fs::create_dir_all(movies_dir)
        .await
        .with_context(|| format!("create movies dir: {}", movies_dir.display()))?;

    let tmp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
    let data = serde_json::to_vec_pretty(movie).context("serialize movie")?;
    fs::write(&tmp_path, &data)
        .await
        .with_context(|| format!("write movie tmp: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("move movie into place: {}", path.display()))?;
    Ok(())
}
