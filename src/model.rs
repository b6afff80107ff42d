// src/model.rs
//! Domain types shared across the pipeline: configured sources, persisted
//! news items and ingestion logs, and the per-run reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::categories::Category;

/// Geographic partition of a source and the items it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    Africa,
    Global,
}

/// How a source's feed is retrieved: a direct feed address, or a free-text
/// query expanded into a search-feed address at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeedDescriptor {
    FeedUrl(String),
    Query(String),
}

/// A configured external feed. Created and edited by the admin surface;
/// the pipeline only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub feed: FeedDescriptor,
    pub scope: Scope,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Moderation lifecycle. The pipeline only ever creates `Pending`; the
/// moderation surface owns the transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

/// A curated item staged for moderation. `url` is globally unique; the
/// dedup check relies on the store enforcing that.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: Uuid,
    pub title: String,
    pub summary: Option<String>,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub scope: Scope,
    pub tags: Vec<String>,
    pub categories: Vec<Category>,
    pub status: ModerationStatus,
    pub source_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Success,
    Error,
}

/// Append-only audit row, one per source per run. Never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionLog {
    pub source_id: String,
    pub ran_at: DateTime<Utc>,
    pub status: RunStatus,
    pub items_found: usize,
    pub items_inserted: usize,
    pub error_message: Option<String>,
}

/// Per-source slice of a batch report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReport {
    pub source_id: String,
    pub items_found: usize,
    pub items_inserted: usize,
}

impl SourceReport {
    pub fn empty(source_id: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            items_found: 0,
            items_inserted: 0,
        }
    }
}

/// The aggregate result of one `run_all` invocation, relayed as JSON by the
/// scheduled trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub sources: Vec<SourceReport>,
    pub ran_at: DateTime<Utc>,
}
