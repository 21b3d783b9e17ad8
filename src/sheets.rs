//! Persistent store access for the tracking sheet.
//!
//! The pipeline talks to its store through the narrow [`RecordStore`]
//! contract: one bulk key read at startup, one batch append at the end.
//! [`SheetsStore`] implements it against the Google Sheets v4 values API.
//!
//! Opening the store is the one failure the pipeline does not isolate: a
//! missing or malformed credentials blob aborts the run, since without a
//! store handle there is nothing to deduplicate against or write to.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::models::SHEET_COLUMNS;
use crate::utils::{truncate_for_log, BoxError};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Name-column range read at startup; row 1 holds the header.
const KEY_RANGE: &str = "Sheet1!A2:A";

/// Table range the batch append targets.
const APPEND_RANGE: &str = "Sheet1!A1";

/// The store contract: one read of all keys, one batch append.
#[async_trait]
pub trait RecordStore {
    /// Return the `Name` column of every existing row.
    async fn read_all_keys(&self) -> Result<HashSet<String>, BoxError>;

    /// Append rows in one batch call and report how many were written.
    ///
    /// Must perform no write at all for an empty input.
    async fn append_rows(&self, rows: Vec<Vec<String>>) -> Result<usize, BoxError>;
}

/// Credentials blob supplied through the environment.
///
/// Token minting is outside this program's scope; the blob must already
/// carry a bearer token valid for the spreadsheet scope.
#[derive(Debug, Deserialize)]
struct SheetCredentials {
    token: String,
    #[serde(default)]
    client_email: String,
}

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct AppendRequest<'a> {
    values: &'a [Vec<String>],
}

/// Google Sheets-backed [`RecordStore`].
pub struct SheetsStore {
    client: reqwest::Client,
    sheet_id: String,
    token: String,
}

impl SheetsStore {
    /// Open the tracking sheet from a spreadsheet id and a credentials blob.
    ///
    /// # Errors
    ///
    /// Fails when the blob is not valid JSON or carries an empty token.
    /// This error is fatal to the run.
    pub fn open(
        sheet_id: &str,
        credentials_json: &str,
        client: reqwest::Client,
    ) -> Result<Self, BoxError> {
        let creds: SheetCredentials = serde_json::from_str(credentials_json).map_err(|e| {
            format!(
                "malformed credentials blob ({e}): {}",
                truncate_for_log(credentials_json, 60)
            )
        })?;
        if creds.token.trim().is_empty() {
            return Err("credentials blob carries an empty token".into());
        }
        if !creds.client_email.is_empty() {
            info!(client_email = %creds.client_email, "Opening sheet with service credentials");
        }
        Ok(Self {
            client,
            sheet_id: sheet_id.to_string(),
            token: creds.token,
        })
    }
}

#[async_trait]
impl RecordStore for SheetsStore {
    #[instrument(level = "info", skip_all, fields(sheet_id = %self.sheet_id))]
    async fn read_all_keys(&self) -> Result<HashSet<String>, BoxError> {
        let url = format!("{SHEETS_API_BASE}/{}/values/{KEY_RANGE}", self.sheet_id);
        let range: ValueRange = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let keys: HashSet<String> = range
            .values
            .into_iter()
            .filter_map(|mut row| (!row.is_empty()).then(|| row.remove(0)))
            .filter(|name| !name.is_empty())
            .collect();
        info!(count = keys.len(), "Loaded existing names from sheet");
        Ok(keys)
    }

    #[instrument(level = "info", skip_all, fields(sheet_id = %self.sheet_id, rows = rows.len()))]
    async fn append_rows(&self, rows: Vec<Vec<String>>) -> Result<usize, BoxError> {
        if rows.is_empty() {
            return Ok(0);
        }
        // Row width must match the sheet's column layout exactly.
        if let Some(bad) = rows.iter().find(|row| row.len() != SHEET_COLUMNS.len()) {
            return Err(format!(
                "refusing to append a {}-cell row to a {}-column sheet",
                bad.len(),
                SHEET_COLUMNS.len()
            )
            .into());
        }
        let url = format!(
            "{SHEETS_API_BASE}/{}/values/{APPEND_RANGE}:append",
            self.sheet_id
        );
        self.client
            .post(&url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.token)
            .json(&AppendRequest { values: &rows })
            .send()
            .await?
            .error_for_status()?;

        info!(count = rows.len(), "Appended rows to sheet");
        Ok(rows.len())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::InMemoryStore;
    use super::*;

    #[test]
    fn test_open_rejects_malformed_blob() {
        let client = reqwest::Client::new();
        assert!(SheetsStore::open("sheet", "not json", client).is_err());
    }

    #[test]
    fn test_open_rejects_missing_token() {
        let client = reqwest::Client::new();
        let err = SheetsStore::open("sheet", r#"{"client_email":"svc@x"}"#, client);
        assert!(err.is_err());
    }

    #[test]
    fn test_open_rejects_blank_token() {
        let client = reqwest::Client::new();
        assert!(SheetsStore::open("sheet", r#"{"token":"  "}"#, client).is_err());
    }

    #[test]
    fn test_open_accepts_token_blob() {
        let client = reqwest::Client::new();
        let store = SheetsStore::open(
            "sheet",
            r#"{"token":"ya29.test","client_email":"svc@project.iam"}"#,
            client,
        );
        assert!(store.is_ok());
    }

    #[test]
    fn test_value_range_tolerates_absent_values_field() {
        // An empty sheet answers without a `values` key at all.
        let range: ValueRange = serde_json::from_str("{}").unwrap();
        assert!(range.values.is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_append_feeds_key_reads() {
        let store = InMemoryStore::default();
        assert!(store.read_all_keys().await.unwrap().is_empty());

        let added = store
            .append_rows(vec![vec!["Acme Corp".to_string(), "Fintech".to_string()]])
            .await
            .unwrap();
        assert_eq!(added, 1);

        let keys = store.read_all_keys().await.unwrap();
        assert!(keys.contains("Acme Corp"));
    }

    #[tokio::test]
    async fn test_sheets_append_rejects_malformed_row_width() {
        let client = reqwest::Client::new();
        let store = SheetsStore::open("sheet", r#"{"token":"t"}"#, client).unwrap();
        // Rejected before any network call is attempted.
        let result = store
            .append_rows(vec![vec!["only one cell".to_string()]])
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_empty_append_writes_nothing() {
        let store = InMemoryStore::default();
        let added = store.append_rows(Vec::new()).await.unwrap();
        assert_eq!(added, 0);
        assert!(store.rows.lock().unwrap().is_empty());
    }
}
