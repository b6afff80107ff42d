// src/ingest/dedup.rs
//! "Already ingested" check against the store. URL equality first; the
//! title+date fallback catches the same article re-syndicated under a
//! different URL. A fallback hit on an unrelated same-day article with an
//! identical title is an accepted trade-off.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::store::NewsStore;

/// The identity of a candidate entry, as checked before insert.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub url: &'a str,
    pub title: &'a str,
    pub published_at: DateTime<Utc>,
}

pub struct Deduplicator<'a> {
    store: &'a dyn NewsStore,
}

impl<'a> Deduplicator<'a> {
    pub fn new(store: &'a dyn NewsStore) -> Self {
        Self { store }
    }

    /// True when the candidate already exists; existing items are never
    /// updated, the candidate is simply discarded.
    pub async fn exists(&self, candidate: &Candidate<'_>) -> Result<bool> {
        if self
            .store
            .find_news_item_by_url(candidate.url)
            .await?
            .is_some()
        {
            return Ok(true);
        }
        Ok(self
            .store
            .find_news_item_by_title_and_date(candidate.title, candidate.published_at)
            .await?
            .is_some())
    }
}
