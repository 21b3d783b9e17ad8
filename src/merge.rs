//! Deduplication of collected records against the sheet's existing rows.
//!
//! The key is the normalized `name` field, compared by exact string
//! equality against the key set loaded once at the start of the run. Two
//! sources reporting the same startup within a single run are both kept:
//! only the pre-run key set is consulted, so within-run duplicates are an
//! accepted gap, collapsed naturally on the next run once the first copy
//! has landed in the sheet.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::models::FundingRecord;

/// Filter candidates down to records not yet present in the sheet.
///
/// Retains a candidate iff its name is non-empty and not a member of
/// `existing`. Relative order of survivors is preserved. Records with an
/// empty name (a missing title selector upstream) are dropped here as a
/// final guard; they can never be keyed.
#[instrument(level = "debug", skip_all, fields(candidates = candidates.len(), known = existing.len()))]
pub fn filter_new(
    candidates: Vec<FundingRecord>,
    existing: &HashSet<String>,
) -> Vec<FundingRecord> {
    let fresh: Vec<FundingRecord> = candidates
        .into_iter()
        .filter(|record| {
            if record.name.is_empty() {
                debug!(source = %record.source, "Dropping record with empty name");
                return false;
            }
            !existing.contains(&record.name)
        })
        .collect();
    debug!(fresh = fresh.len(), "Filtered candidates against existing keys");
    fresh
}
