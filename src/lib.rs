// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod categories;
pub mod config;
pub mod ingest;
pub mod metrics;
pub mod model;
pub mod relevance;
pub mod store;
pub mod text;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::ingest::fetch::{FeedDocument, FetchError, FetchFeed, HttpFetcher, RawEntry};
pub use crate::ingest::{CancelFlag, Ingestor};
pub use crate::model::{
    FeedDescriptor, IngestionLog, ModerationStatus, NewsItem, RunReport, RunStatus, Scope, Source,
    SourceReport,
};
pub use crate::store::{MemoryStore, NewsStore};
