//! Africa AI News Ingest — Binary Entrypoint
//! Boots the Axum HTTP server, wiring the store, fetcher, and ingestion
//! runner behind the scheduled-trigger routes.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use africa_ai_news_ingest::api::{self, AppState};
use africa_ai_news_ingest::config::AppConfig;
use africa_ai_news_ingest::ingest::fetch::HttpFetcher;
use africa_ai_news_ingest::ingest::Ingestor;
use africa_ai_news_ingest::metrics::Metrics;
use africa_ai_news_ingest::store::{self, MemoryStore};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ingest=info,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = AppConfig::from_env()?;
    let metrics = Metrics::init(cfg.max_concurrent_sources);

    let store = Arc::new(MemoryStore::new());
    if let Some(path) = &cfg.seed_sources_path {
        let sources = store::load_seed_sources(path)?;
        info!(count = sources.len(), path = %path.display(), "seeded sources");
        for source in sources {
            store.add_source(source);
        }
    }

    let fetcher = Arc::new(HttpFetcher::new(cfg.fetch_timeout));
    let ingestor = Arc::new(Ingestor::new(
        store.clone(),
        fetcher,
        cfg.max_concurrent_sources,
    ));

    let state = AppState {
        ingestor,
        cron_secret: cfg.cron_secret.clone(),
    };
    let app = api::create_router(state).merge(metrics.router());

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
