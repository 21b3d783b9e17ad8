//! Source adapters for the sites that publish funding announcements.
//!
//! Each adapter fetches one listing page, locates the repeating item
//! element, and maps site-specific markup onto [`FundingRecord`]s. Selectors
//! are bespoke per site and brittle by nature; a structural change on a
//! source site is an expected failure mode, answered with an empty result
//! for that source rather than a crash.
//!
//! # Supported Sources
//!
//! | Source | Module | Detail fetch | Notes |
//! |--------|--------|--------------|-------|
//! | Crunchbase News | [`crunchbase`] | yes, paced | Series A/B Europe & Middle East section |
//! | SeedTable | [`seedtable`] | no | startup directory cards |
//! | EU-Startups | [`eu_startups`] | yes, paced | funding category posts |
//!
//! # Failure isolation
//!
//! `fetch_records` never raises past the adapter boundary. A listing-level
//! failure logs and yields an empty vector; a malformed item logs and is
//! skipped; a missing optional field becomes an empty string.

pub mod crunchbase;
pub mod eu_startups;
pub mod seedtable;

use async_trait::async_trait;
use scraper::{ElementRef, Selector};
use tracing::info;

use crate::models::FundingRecord;
use crate::pacing::Pacer;
use crate::utils::normalize;

/// Browser signature sent with every outbound request; several of the
/// sources reject default client user agents.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// One site-specific extractor producing normalized records.
#[async_trait]
pub trait FundingSource: Send + Sync {
    /// Stable label written into each record's `Source` column.
    fn name(&self) -> &'static str;

    /// Fetch and normalize this source's current listing.
    ///
    /// Never fails: network errors, unparsable pages, and malformed items
    /// are logged inside the adapter, which then yields whatever it could
    /// extract (possibly nothing).
    async fn fetch_records(&self) -> Vec<FundingRecord>;
}

/// The ordered adapter registry for a run.
pub fn default_sources(client: &reqwest::Client, pacer: Pacer) -> Vec<Box<dyn FundingSource>> {
    vec![
        Box::new(crunchbase::CrunchbaseNews::new(client.clone(), pacer)),
        Box::new(seedtable::SeedTable::new(client.clone())),
        Box::new(eu_startups::EuStartups::new(client.clone(), pacer)),
    ]
}

/// Run every registered adapter in order and concatenate their outputs.
///
/// Adapters share no mutable state and are fully failure-isolated, so one
/// source coming back empty never affects the others. Per-adapter internal
/// order is preserved; no cross-adapter order is imposed beyond registry
/// order.
pub async fn collect_records(sources: &[Box<dyn FundingSource>]) -> Vec<FundingRecord> {
    let mut all = Vec::new();
    for source in sources {
        info!(source = source.name(), "Collecting from source");
        let records = source.fetch_records().await;
        info!(
            source = source.name(),
            count = records.len(),
            "Source finished"
        );
        all.extend(records);
    }
    info!(total = all.len(), "Collected candidate records");
    all
}

/// First match of `selector` under `scope`, as normalized text.
///
/// Missing optional selectors yield an empty string, never a failure.
pub(crate) fn select_text(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope
        .select(selector)
        .next()
        .map(|el| normalize(&el.text().collect::<Vec<_>>().join(" ")))
        .unwrap_or_default()
}
