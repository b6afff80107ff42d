// src/store.rs
//! Persistence collaborator contract consumed by the pipeline, plus the
//! in-process store backing the binary and the test suites. The pipeline
//! needs lookups and inserts only; updates and deletes belong to the
//! moderation surface.

use std::path::Path;
use std::sync::RwLock;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{IngestionLog, NewsItem, Source};

#[async_trait]
pub trait NewsStore: Send + Sync {
    async fn find_source(&self, id: &str) -> Result<Option<Source>>;
    async fn list_active_sources(&self) -> Result<Vec<Source>>;
    async fn find_news_item_by_url(&self, url: &str) -> Result<Option<NewsItem>>;
    async fn find_news_item_by_title_and_date(
        &self,
        title: &str,
        published_at: DateTime<Utc>,
    ) -> Result<Option<NewsItem>>;
    /// Fails when the URL already exists; `url` uniqueness is the store's
    /// invariant to enforce.
    async fn insert_news_item(&self, item: NewsItem) -> Result<()>;
    async fn insert_ingestion_log(&self, entry: IngestionLog) -> Result<()>;
}

#[derive(Debug, Default)]
struct Inner {
    sources: Vec<Source>,
    items: Vec<NewsItem>,
    logs: Vec<IngestionLog>,
}

/// In-memory `NewsStore`. Concurrent writers are serialized on one lock;
/// lock sections never span an await.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sources(sources: Vec<Source>) -> Self {
        let store = Self::new();
        for source in sources {
            store.add_source(source);
        }
        store
    }

    pub fn add_source(&self, source: Source) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.sources.push(source);
    }

    pub fn items_snapshot(&self) -> Vec<NewsItem> {
        self.inner.read().expect("store lock poisoned").items.clone()
    }

    pub fn logs_snapshot(&self) -> Vec<IngestionLog> {
        self.inner.read().expect("store lock poisoned").logs.clone()
    }
}

#[async_trait]
impl NewsStore for MemoryStore {
    async fn find_source(&self, id: &str) -> Result<Option<Source>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.sources.iter().find(|s| s.id == id).cloned())
    }

    async fn list_active_sources(&self) -> Result<Vec<Source>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.sources.iter().filter(|s| s.active).cloned().collect())
    }

    async fn find_news_item_by_url(&self, url: &str) -> Result<Option<NewsItem>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.items.iter().find(|i| i.url == url).cloned())
    }

    async fn find_news_item_by_title_and_date(
        &self,
        title: &str,
        published_at: DateTime<Utc>,
    ) -> Result<Option<NewsItem>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .items
            .iter()
            .find(|i| i.title == title && i.published_at == published_at)
            .cloned())
    }

    async fn insert_news_item(&self, item: NewsItem) -> Result<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if inner.items.iter().any(|i| i.url == item.url) {
            bail!("news item url already exists: {}", item.url);
        }
        inner.items.push(item);
        Ok(())
    }

    async fn insert_ingestion_log(&self, entry: IngestionLog) -> Result<()> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.logs.push(entry);
        Ok(())
    }
}

/// Load the startup source list from a JSON file (an array of `Source`).
pub fn load_seed_sources(path: &Path) -> Result<Vec<Source>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading seed sources from {}", path.display()))?;
    let sources: Vec<Source> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing seed sources from {}", path.display()))?;
    Ok(sources)
}
