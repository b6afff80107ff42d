// src/ingest/fetch.rs
//! Feed retrieval and RSS parsing. One fetch per source per run, bounded by
//! a hard timeout; every failure mode collapses into `FetchError` so the
//! runner can record it without letting it cross source boundaries.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use thiserror::Error;

use crate::ingest::query::{build_search_query, build_search_url};
use crate::model::FeedDescriptor;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("empty search query")]
    EmptyQuery,
    #[error("feed request timed out after {0:?}")]
    Timeout(Duration),
    #[error("requesting feed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("feed responded with HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("parsing feed xml: {0}")]
    Parse(#[source] quick_xml::DeError),
}

/// One raw feed item, as parsed. Dates that fail to parse arrive as `None`
/// and fall back downstream.
#[derive(Debug, Clone, Default)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
}

/// A parsed feed: entries in document order plus the document-level
/// fallback timestamp.
#[derive(Debug, Clone, Default)]
pub struct FeedDocument {
    pub entries: Vec<RawEntry>,
    pub updated: Option<DateTime<Utc>>,
}

/// Seam between the runner and the network, so tests substitute canned
/// documents for live feeds.
#[async_trait]
pub trait FetchFeed: Send + Sync {
    async fn fetch(&self, feed: &FeedDescriptor) -> Result<FeedDocument, FetchError>;
}

/* ----------------------------
RSS document schema
---------------------------- */

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "lastBuildDate")]
    last_build_date: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(rename = "category", default)]
    categories: Vec<String>,
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Feeds in the wild carry HTML entities that are not XML entities.
fn scrub_xml_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

/// Parse an RSS document into entries + document fallback timestamp.
pub fn parse_feed(xml: &str) -> Result<FeedDocument, FetchError> {
    let t0 = std::time::Instant::now();
    let cleaned = scrub_xml_entities(xml);
    let rss: Rss = from_str(&cleaned).map_err(FetchError::Parse)?;

    let updated = rss
        .channel
        .last_build_date
        .as_deref()
        .or(rss.channel.pub_date.as_deref())
        .and_then(parse_date);

    let entries = rss
        .channel
        .items
        .into_iter()
        .map(|item| RawEntry {
            title: item.title,
            link: item.link,
            summary: item.description,
            published_at: item.pub_date.as_deref().and_then(parse_date),
            categories: item.categories,
        })
        .collect::<Vec<_>>();

    histogram!("ingest_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    counter!("ingest_entries_total").increment(entries.len() as u64);

    Ok(FeedDocument { entries, updated })
}

/// Live fetcher. The timeout is an explicit constructor argument so tests
/// and deployments pick their own bound.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("building http client");
        Self { client, timeout }
    }

    /// Resolve a descriptor to the address that will actually be fetched.
    pub fn resolve_url(feed: &FeedDescriptor) -> Result<String, FetchError> {
        match feed {
            FeedDescriptor::FeedUrl(url) => Ok(url.clone()),
            FeedDescriptor::Query(raw) => {
                let query = build_search_query(raw);
                if query.is_empty() {
                    return Err(FetchError::EmptyQuery);
                }
                Ok(build_search_url(&query))
            }
        }
    }

    fn request_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Http(err)
        }
    }
}

#[async_trait]
impl FetchFeed for HttpFetcher {
    async fn fetch(&self, feed: &FeedDescriptor) -> Result<FeedDocument, FetchError> {
        let url = Self::resolve_url(feed)?;
        let t0 = std::time::Instant::now();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        histogram!("ingest_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        parse_feed(&body)
    }
}
