//! # Funding Radar
//!
//! A batch pipeline that collects startup-funding announcements from
//! several independent news sources, normalizes them into one record
//! schema, drops entries the tracking sheet already knows, and appends the
//! remainder in a single batch.
//!
//! ## Features
//!
//! - Scrapes funding announcements from Crunchbase News, SeedTable, and
//!   EU-Startups, each behind its own failure-isolated adapter
//! - Normalizes every extracted field so equivalent values deduplicate
//! - Paces per-article detail fetches with a randomized delay
//! - Appends only genuinely new records, keyed by startup name
//!
//! ## Usage
//!
//! ```sh
//! SHEET_ID=... GCP_CREDENTIALS='{"token":"..."}' funding_radar
//! ```
//!
//! ## Architecture
//!
//! The pipeline runs once per invocation, strictly sequentially:
//! 1. **Load**: read the `Name` column of the sheet into a key set
//! 2. **Collect**: run each source adapter in turn, concatenating outputs
//! 3. **Merge**: filter candidates against the pre-run key set
//! 4. **Append**: write survivors to the sheet in one batch call
//!
//! Scraping failures are diagnostic only; the exit status reflects the
//! store open and the final append.

use clap::Parser;
use itertools::Itertools;
use std::time::Duration;
use tracing::{debug, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod merge;
mod models;
mod pacing;
mod sheets;
mod sources;
mod utils;

use cli::Cli;
use merge::filter_new;
use models::FundingRecord;
use pacing::Pacer;
use sheets::{RecordStore, SheetsStore};
use sources::{collect_records, default_sources, FundingSource};
use utils::BoxError;

/// One full pipeline pass against an opened store.
///
/// Returns the number of rows appended. Zero means the run found nothing
/// new, which is a normal outcome, not an error.
async fn run_once(
    store: &impl RecordStore,
    sources: &[Box<dyn FundingSource>],
) -> Result<usize, BoxError> {
    let existing = store.read_all_keys().await?;
    info!(known = existing.len(), "Loaded existing record names");

    let candidates = collect_records(sources).await;
    let fresh = filter_new(candidates, &existing);

    if fresh.is_empty() {
        info!("No new records to add");
        return Ok(0);
    }

    let by_source = fresh.iter().counts_by(|r| r.source.clone());
    info!(count = fresh.len(), ?by_source, "Appending new records");

    let rows: Vec<Vec<String>> = fresh.iter().map(FundingRecord::to_row).collect();
    let added = store.append_rows(rows).await?;
    info!(added, "Added new records to the sheet");
    Ok(added)
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), BoxError> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("funding_radar starting up");

    let args = Cli::parse();
    debug!(?args.sheet_id, args.min_delay, args.max_delay, "Parsed CLI arguments");

    // Shared HTTP client: browser user agent plus a hard per-request
    // timeout, so one hung socket cannot wedge the whole batch.
    let client = reqwest::Client::builder()
        .user_agent(sources::USER_AGENT)
        .timeout(Duration::from_secs(args.http_timeout))
        .build()?;

    // Opening the store is the one failure that aborts the run.
    let store = SheetsStore::open(&args.sheet_id, &args.credentials, client.clone())?;
    let pacer = Pacer::new(args.min_delay, args.max_delay)?;
    let registry = default_sources(&client, pacer);
    info!(sources = registry.len(), "Source adapters registered");

    let added = run_once(&store, &registry).await?;

    let elapsed = start_time.elapsed();
    info!(
        added,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::testing::InMemoryStore;
    use crate::sources::testing::StaticSource;

    fn registry(sources: Vec<StaticSource>) -> Vec<Box<dyn FundingSource>> {
        sources
            .into_iter()
            .map(|s| Box::new(s) as Box<dyn FundingSource>)
            .collect()
    }

    // Store contains {"Acme Corp"}; adapter A yields Acme+Beta, adapter B
    // yields Beta+Gamma. The appended set keeps both Beta copies.
    #[tokio::test]
    async fn test_merge_scenario_retains_within_run_duplicate() {
        let store = InMemoryStore::with_keys(["Acme Corp"]);
        let sources = registry(vec![
            StaticSource::yielding("a", &["Acme Corp", "Beta Inc"]),
            StaticSource::yielding("b", &["Beta Inc", "Gamma LLC"]),
        ]);

        let added = run_once(&store, &sources).await.unwrap();
        assert_eq!(added, 3);

        let rows = store.rows.lock().unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(names, vec!["Beta Inc", "Beta Inc", "Gamma LLC"]);
    }

    #[tokio::test]
    async fn test_second_run_appends_nothing() {
        let store = InMemoryStore::default();
        let sources = registry(vec![StaticSource::yielding("a", &["Beta Inc", "Gamma LLC"])]);

        let first = run_once(&store, &sources).await.unwrap();
        assert_eq!(first, 2);

        let second = run_once(&store, &sources).await.unwrap();
        assert_eq!(second, 0);
        assert_eq!(store.rows.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_source_does_not_block_append() {
        let store = InMemoryStore::default();
        let sources = registry(vec![
            StaticSource::failing("broken"),
            StaticSource::yielding("b", &["Gamma LLC"]),
        ]);

        let added = run_once(&store, &sources).await.unwrap();
        assert_eq!(added, 1);
    }

    #[tokio::test]
    async fn test_empty_names_never_reach_the_store() {
        let store = InMemoryStore::default();
        let sources = registry(vec![StaticSource::yielding("a", &["", "Delta"])]);

        let added = run_once(&store, &sources).await.unwrap();
        assert_eq!(added, 1);
        let rows = store.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "Delta");
    }

    #[tokio::test]
    async fn test_appended_rows_have_the_full_column_set() {
        let store = InMemoryStore::default();
        let sources = registry(vec![StaticSource::yielding("a", &["Beta Inc"])]);

        run_once(&store, &sources).await.unwrap();
        let rows = store.rows.lock().unwrap();
        for row in rows.iter() {
            assert_eq!(row.len(), crate::models::SHEET_COLUMNS.len());
        }
    }

    #[tokio::test]
    async fn test_nothing_new_performs_no_write() {
        let store = InMemoryStore::with_keys(["Beta Inc"]);
        let sources = registry(vec![StaticSource::yielding("a", &["Beta Inc"])]);

        let added = run_once(&store, &sources).await.unwrap();
        assert_eq!(added, 0);
        assert!(store.rows.lock().unwrap().is_empty());
    }
}
