#![deny(unused)]
//! CallerInsight - manual lookup surface.
//!
//! Wires the HTTP insight client, the coalescing cache, and the history file
//! together and looks up one number from the command line. The overlay
//! subsystem consumes the same stack; its presentation surface lives with the
//! host platform, not here.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use caller_insight_client::HttpInsightClient;
use caller_insight_core::config::AppConfig;
use caller_insight_core::{HistorySink, PhoneNumber};
use caller_insight_history::{InMemoryHistory, JsonFileHistory};
use caller_insight_lookup::{InsightCache, RequestGuard};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "callerinsight=info".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let Some(number_raw) = std::env::args().nth(1) else {
        eprintln!("usage: callerinsight <phone-number>");
        return Ok(ExitCode::from(2));
    };

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "No usable configuration, falling back to defaults");
            AppConfig::default()
        }
    };

    let client = Arc::new(HttpInsightClient::new(&config.client)?);
    let cache = InsightCache::new(client, Duration::from_secs(config.lookup.ttl_secs));
    let history: Arc<dyn HistorySink> = match &config.history.path {
        Some(path) => Arc::new(JsonFileHistory::new(path, config.history.max_entries)),
        None => Arc::new(InMemoryHistory::new(config.history.max_entries)),
    };

    let number = PhoneNumber::normalize(&number_raw);
    tracing::info!(number = %number, "Looking up caller insight");

    // Same consumption contract as the overlay surface; a single-shot lookup
    // simply never gets superseded.
    let guard = RequestGuard::new();
    let token = guard.begin();
    let result = cache.lookup(&number_raw).await;
    if !guard.is_current(token) {
        return Ok(ExitCode::SUCCESS);
    }

    match result {
        Ok(insight) => {
            if let Err(e) = history.save(number.as_str(), &insight.summary).await {
                tracing::warn!(error = %e, "Failed to record lookup history");
            }

            match &insight.confidence {
                Some(c) => println!("Risk: {} (confidence: {c})", insight.risk_level),
                None => println!("Risk: {}", insight.risk_level),
            }
            println!("{}", insight.summary);
            if let Some(link) = &insight.web_link {
                let title = insight.web_title.as_deref().unwrap_or("Top result");
                println!("{title}: {link}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Lookup failed: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
