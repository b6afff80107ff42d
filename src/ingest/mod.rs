// src/ingest/mod.rs
//! Ingestion runner: one source's fetch, normalize, classify, filter,
//! dedupe, persist state machine, plus the batch orchestration over all
//! active sources. Failures stay inside the smallest unit: a bad entry is
//! skipped, a bad source is logged, the batch always completes.

pub mod dedup;
pub mod fetch;
pub mod query;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::categories;
use crate::ingest::dedup::{Candidate, Deduplicator};
use crate::ingest::fetch::{FeedDocument, FetchFeed};
use crate::model::{
    IngestionLog, ModerationStatus, NewsItem, RunReport, RunStatus, Scope, Source, SourceReport,
};
use crate::relevance::{build_relevance_text, is_region_relevant, is_topic_relevant};
use crate::store::NewsStore;
use crate::text;

const UNTITLED: &str = "Untitled";

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_runs_total", "Batch ingestion runs started.");
        describe_counter!("ingest_entries_total", "Raw entries parsed from feeds.");
        describe_counter!(
            "ingest_entries_skipped_total",
            "Entries skipped for a missing link."
        );
        describe_counter!("ingest_items_found_total", "Raw entries seen per source run.");
        describe_counter!(
            "ingest_items_inserted_total",
            "News items persisted after filtering and dedup."
        );
        describe_counter!("ingest_source_errors_total", "Source fetches that failed.");
        describe_histogram!("ingest_fetch_ms", "Feed fetch time in milliseconds.");
        describe_histogram!("ingest_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!("ingest_last_run_ts", "Unix ts when a batch run last started.");
    });
}

/// Ordered union of source default tags and an entry's own terms, trimmed,
/// first occurrence wins.
pub fn merge_tags(source_tags: &[String], entry_terms: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for tag in source_tags.iter().chain(entry_terms) {
        let tag = tag.trim();
        if tag.is_empty() || !seen.insert(tag.to_string()) {
            continue;
        }
        merged.push(tag.to_string());
    }
    merged
}

/// Cooperative stop for a batch run: once set, no new source fetch starts;
/// in-flight sources finish or fail on their own.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The ingestion pipeline, wired to its collaborators once at startup.
#[derive(Clone)]
pub struct Ingestor {
    store: Arc<dyn NewsStore>,
    fetcher: Arc<dyn FetchFeed>,
    max_concurrent_sources: usize,
}

impl Ingestor {
    pub fn new(
        store: Arc<dyn NewsStore>,
        fetcher: Arc<dyn FetchFeed>,
        max_concurrent_sources: usize,
    ) -> Self {
        Self {
            store,
            fetcher,
            max_concurrent_sources: max_concurrent_sources.max(1),
        }
    }

    /// Run ingestion for a single source by id. An unknown or inactive
    /// source reports zero counts and writes no log row.
    pub async fn run_source(&self, source_id: &str) -> Result<SourceReport> {
        ensure_metrics_described();
        let Some(source) = self.store.find_source(source_id).await? else {
            return Ok(SourceReport::empty(source_id));
        };
        if !source.active {
            return Ok(SourceReport::empty(source_id));
        }
        Ok(self.run_one(&source).await)
    }

    /// Run ingestion for every active source with bounded parallelism.
    pub async fn run_all(&self) -> Result<RunReport> {
        self.run_all_cancellable(CancelFlag::new()).await
    }

    /// As `run_all`, but stops launching new source runs once `cancel` is
    /// set. Sources never started are absent from the report.
    pub async fn run_all_cancellable(&self, cancel: CancelFlag) -> Result<RunReport> {
        ensure_metrics_described();
        let ran_at = Utc::now();
        let sources = self.store.list_active_sources().await?;
        let total = sources.len();

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_sources));
        let mut workers: JoinSet<(usize, SourceReport)> = JoinSet::new();

        for (idx, source) in sources.into_iter().enumerate() {
            if cancel.is_cancelled() {
                info!(target: "ingest", launched = idx, total, "batch cancelled");
                break;
            }
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .expect("semaphore closed");
            if cancel.is_cancelled() {
                info!(target: "ingest", launched = idx, total, "batch cancelled");
                break;
            }
            let this = self.clone();
            workers.spawn(async move {
                let _permit = permit;
                let report = this.run_one(&source).await;
                (idx, report)
            });
        }

        let mut collected = Vec::with_capacity(total);
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(pair) => collected.push(pair),
                Err(err) => warn!(target: "ingest", error = %err, "source worker panicked"),
            }
        }
        collected.sort_by_key(|(idx, _)| *idx);

        counter!("ingest_runs_total").increment(1);
        gauge!("ingest_last_run_ts").set(ran_at.timestamp() as f64);

        Ok(RunReport {
            sources: collected.into_iter().map(|(_, report)| report).collect(),
            ran_at,
        })
    }

    /// The per-source state machine. Never fails the batch: fetch errors are
    /// recorded as an ERROR log row, store hiccups are warned and skipped.
    async fn run_one(&self, source: &Source) -> SourceReport {
        let ran_at = Utc::now();

        let document = match self.fetcher.fetch(&source.feed).await {
            Ok(document) => document,
            Err(err) => {
                warn!(target: "ingest", source = %source.id, error = %err, "feed fetch failed");
                counter!("ingest_source_errors_total").increment(1);
                self.record_log(IngestionLog {
                    source_id: source.id.clone(),
                    ran_at,
                    status: RunStatus::Error,
                    items_found: 0,
                    items_inserted: 0,
                    error_message: Some(err.to_string()),
                })
                .await;
                return SourceReport::empty(&source.id);
            }
        };

        let items_found = document.entries.len();
        let items_inserted = self.ingest_entries(source, &document).await;

        counter!("ingest_items_found_total").increment(items_found as u64);
        counter!("ingest_items_inserted_total").increment(items_inserted as u64);
        info!(
            target: "ingest",
            source = %source.id,
            found = items_found,
            inserted = items_inserted,
            "source ingested"
        );

        self.record_log(IngestionLog {
            source_id: source.id.clone(),
            ran_at,
            status: RunStatus::Success,
            items_found,
            items_inserted,
            error_message: None,
        })
        .await;

        SourceReport {
            source_id: source.id.clone(),
            items_found,
            items_inserted,
        }
    }

    /// Normalize, filter, dedupe, and persist each raw entry in feed order.
    /// Returns the inserted count.
    async fn ingest_entries(&self, source: &Source, document: &FeedDocument) -> usize {
        let dedup = Deduplicator::new(self.store.as_ref());
        // First occurrence wins when a malformed feed repeats a URL.
        let mut seen_urls: HashSet<String> = HashSet::new();
        let mut inserted = 0usize;

        for entry in &document.entries {
            let url = text::normalize(entry.link.as_deref().unwrap_or_default());
            if url.is_empty() {
                counter!("ingest_entries_skipped_total").increment(1);
                continue;
            }
            if !seen_urls.insert(url.clone()) {
                continue;
            }

            let title = text::normalize(entry.title.as_deref().unwrap_or(UNTITLED));
            let summary_raw =
                text::normalize(&text::strip_markup(entry.summary.as_deref().unwrap_or_default()));
            let summary = if summary_raw.is_empty() {
                None
            } else {
                Some(text::truncate(&summary_raw, text::SUMMARY_MAX_CHARS))
            };

            let published_at = entry
                .published_at
                .or(document.updated)
                .unwrap_or_else(Utc::now);

            let tags = merge_tags(&source.tags, &entry.categories);
            let relevance_text = build_relevance_text(&[
                &title,
                summary.as_deref().unwrap_or_default(),
                &tags.join(" "),
            ]);

            if !is_topic_relevant(&relevance_text) {
                continue;
            }
            if source.scope == Scope::Africa && !is_region_relevant(&relevance_text) {
                continue;
            }

            let candidate = Candidate {
                url: &url,
                title: &title,
                published_at,
            };
            match dedup.exists(&candidate).await {
                Ok(true) => continue,
                Ok(false) => {}
                Err(err) => {
                    warn!(target: "ingest", source = %source.id, url = %url, error = %err, "dedup lookup failed");
                    continue;
                }
            }

            let item = NewsItem {
                id: Uuid::new_v4(),
                title,
                summary,
                url,
                published_at,
                scope: source.scope,
                tags,
                categories: categories::classify(&relevance_text),
                status: ModerationStatus::Pending,
                source_id: source.id.clone(),
            };
            if let Err(err) = self.store.insert_news_item(item).await {
                warn!(target: "ingest", source = %source.id, error = %err, "news item insert failed");
                continue;
            }
            inserted += 1;
        }

        inserted
    }

    async fn record_log(&self, entry: IngestionLog) {
        let source_id = entry.source_id.clone();
        if let Err(err) = self.store.insert_ingestion_log(entry).await {
            warn!(target: "ingest", source = %source_id, error = %err, "failed to record ingestion log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_tags_preserves_order_and_dedupes() {
        let source_tags = vec!["ai".to_string(), "africa".to_string()];
        let entry_terms = vec![" africa ".to_string(), "health".to_string(), "".to_string()];
        assert_eq!(merge_tags(&source_tags, &entry_terms), vec!["ai", "africa", "health"]);
    }

    #[test]
    fn merge_tags_is_case_sensitive() {
        let source_tags = vec!["AI".to_string()];
        let entry_terms = vec!["ai".to_string()];
        assert_eq!(merge_tags(&source_tags, &entry_terms), vec!["AI", "ai"]);
    }

    #[test]
    fn cancel_flag_latches() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());
        flag.cancel();
        assert!(flag.is_cancelled());
        assert!(flag.clone().is_cancelled());
    }
}
