//! Data models for normalized funding records.
//!
//! This module defines the canonical record shape every source adapter must
//! produce, along with the fixed column layout of the tracking sheet:
//! - [`FundingRecord`]: one normalized startup/funding announcement
//! - [`SHEET_COLUMNS`]: the persisted column order, which every appended row
//!   must match exactly
//!
//! Records are constructed once inside an adapter, passed by value through
//! aggregation and deduplication, and either discarded (already known) or
//! appended to the sheet. They are never mutated after construction.

/// Column order of the tracking sheet.
///
/// [`FundingRecord::to_row`] emits cells in exactly this order. The trailing
/// `Source` column identifies which adapter produced the record.
pub const SHEET_COLUMNS: [&str; 12] = [
    "Name",
    "Industry",
    "Country",
    "Activities",
    "Website URL",
    "Contact Name",
    "Contact Position",
    "Contact Email",
    "LinkedIn Url",
    "Funding Stage",
    "Last update",
    "Source",
];

/// A normalized funding announcement, one per discovered startup/article.
///
/// `name` is the deduplication key: two records with an equal normalized
/// name are considered the same entity regardless of other fields. A record
/// with an empty name is never written to the sheet.
///
/// Fields a source cannot provide stay as their defaults (empty string), so
/// a persisted row never contains a null cell.
#[derive(Debug, Clone, Default)]
pub struct FundingRecord {
    /// Startup or article name; deduplication key, required non-empty.
    pub name: String,
    /// Industry or sector, when the source exposes one.
    pub industry: String,
    /// Country or location, when the source exposes one.
    pub country: String,
    /// Free-text summary/description of what the startup does.
    pub activities: String,
    /// The startup's own website, when the source links it.
    pub website_url: String,
    /// Contact person name.
    pub contact_name: String,
    /// Contact person position.
    pub contact_position: String,
    /// Contact person email.
    pub contact_email: String,
    /// LinkedIn profile or company page.
    pub linkedin_url: String,
    /// Funding stage or amount; adapters fall back to a sentinel when the
    /// page does not state one.
    pub funding_stage: String,
    /// ISO-8601 date the record was collected.
    pub last_update: String,
    /// Label of the adapter that produced this record.
    pub source: String,
}

impl FundingRecord {
    /// Serialize this record into a sheet row.
    ///
    /// Cell order matches [`SHEET_COLUMNS`] exactly; absent fields are
    /// emitted as empty strings, never skipped.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.industry.clone(),
            self.country.clone(),
            self.activities.clone(),
            self.website_url.clone(),
            self.contact_name.clone(),
            self.contact_position.clone(),
            self.contact_email.clone(),
            self.linkedin_url.clone(),
            self.funding_stage.clone(),
            self.last_update.clone(),
            self.source.clone(),
        ]
    }
}
