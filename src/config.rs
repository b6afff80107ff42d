// src/config.rs
//! Environment-driven configuration. Everything the pipeline tunes (fetch
//! timeout, worker pool size, trigger secret) is read once here and passed
//! down as explicit values, so tests override per instance instead of
//! poking globals.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const ENV_FETCH_TIMEOUT_SECS: &str = "FEED_FETCH_TIMEOUT_SECS";
const ENV_CONCURRENCY: &str = "INGEST_CONCURRENCY";
const ENV_CRON_SECRET: &str = "CRON_SECRET";
const ENV_PORT: &str = "PORT";
const ENV_SEED_SOURCES_PATH: &str = "SEED_SOURCES_PATH";

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub fetch_timeout: Duration,
    pub max_concurrent_sources: usize,
    pub cron_secret: Option<String>,
    pub port: u16,
    pub seed_sources_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            max_concurrent_sources: DEFAULT_CONCURRENCY,
            cron_secret: None,
            port: DEFAULT_PORT,
            seed_sources_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(raw) = non_empty(ENV_FETCH_TIMEOUT_SECS) {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("parsing {ENV_FETCH_TIMEOUT_SECS}={raw}"))?;
            cfg.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = non_empty(ENV_CONCURRENCY) {
            cfg.max_concurrent_sources = raw
                .parse()
                .with_context(|| format!("parsing {ENV_CONCURRENCY}={raw}"))?;
        }
        if let Some(raw) = non_empty(ENV_PORT) {
            cfg.port = raw
                .parse()
                .with_context(|| format!("parsing {ENV_PORT}={raw}"))?;
        }
        cfg.cron_secret = non_empty(ENV_CRON_SECRET);
        cfg.seed_sources_path = non_empty(ENV_SEED_SOURCES_PATH).map(PathBuf::from);

        Ok(cfg)
    }
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn clear_env() {
        for name in [
            ENV_FETCH_TIMEOUT_SECS,
            ENV_CONCURRENCY,
            ENV_CRON_SECRET,
            ENV_PORT,
            ENV_SEED_SOURCES_PATH,
        ] {
            env::remove_var(name);
        }
    }

    #[serial_test::serial]
    #[test]
    fn defaults_apply_without_env() {
        clear_env();
        let cfg = AppConfig::from_env().unwrap();
        assert_eq!(cfg.fetch_timeout, Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS));
        assert_eq!(cfg.max_concurrent_sources, DEFAULT_CONCURRENCY);
        assert!(cfg.cron_secret.is_none());
        assert!(cfg.seed_sources_path.is_none());
    }

    #[serial_test::serial]
    #[test]
    fn env_overrides_are_parsed() {
        clear_env();
        env::set_var(ENV_FETCH_TIMEOUT_SECS, "5");
        env::set_var(ENV_CONCURRENCY, "2");
        env::set_var(ENV_CRON_SECRET, "s3cret");
        let cfg = AppConfig::from_env().unwrap();
        assert_eq!(cfg.fetch_timeout, Duration::from_secs(5));
        assert_eq!(cfg.max_concurrent_sources, 2);
        assert_eq!(cfg.cron_secret.as_deref(), Some("s3cret"));
        clear_env();
    }

    #[serial_test::serial]
    #[test]
    fn invalid_numbers_error_with_context() {
        clear_env();
        env::set_var(ENV_CONCURRENCY, "lots");
        let err = AppConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(ENV_CONCURRENCY));
        clear_env();
    }

    #[serial_test::serial]
    #[test]
    fn blank_secret_means_open_trigger() {
        clear_env();
        env::set_var(ENV_CRON_SECRET, "   ");
        let cfg = AppConfig::from_env().unwrap();
        assert!(cfg.cron_secret.is_none());
        clear_env();
    }
}
