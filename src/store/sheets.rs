//! store::sheets
//!
//! Spreadsheet backend using the Google Sheets values REST API.
//!
//! # Design
//!
//! The record occupies a fixed row-range (`Sheet1!A:B`):
//!
//! | row | A            | B       |
//! |-----|--------------|---------|
//! | 1   | `Email`      | `Count` |
//! | 2   | (empty)      | count   |
//! | 3.. | email        |         |
//!
//! Loads GET the whole range and decode it (count from cell B2, falling
//! back to the seeded baseline when absent or unparseable; emails from
//! column A below the header). Saves PUT the whole range back with
//! `valueInputOption=RAW`, replacing the record in one call.
//!
//! An empty sheet (the API omits `values` entirely) is not an error;
//! it decodes to the default seeded state.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{StoreError, WaitlistStore};
use crate::core::types::{WaitlistState, SEED_COUNT};

/// Default Sheets REST API base URL.
const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";

/// Row-range holding the waitlist record.
const RANGE: &str = "Sheet1!A:B";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "waitroom";

/// Bound on each backend request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Spreadsheet-backed waitlist store.
pub struct SheetsStore {
    /// HTTP client for making requests
    client: Client,
    /// Spreadsheet id
    spreadsheet_id: String,
    /// OAuth2 bearer token
    token: String,
    /// API base URL (overridable for tests)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for SheetsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsStore")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl SheetsStore {
    /// Create a Sheets store for the given spreadsheet.
    pub fn new(spreadsheet_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            spreadsheet_id: spreadsheet_id.into(),
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Create a store against a custom API base URL.
    ///
    /// This is primarily useful for testing against a local mock server.
    pub fn with_api_base(
        spreadsheet_id: impl Into<String>,
        token: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            spreadsheet_id: spreadsheet_id.into(),
            token: token.into(),
            api_base: api_base.into(),
        }
    }

    /// URL of the record's row-range.
    fn values_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.api_base, self.spreadsheet_id, RANGE
        )
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))
                .map_err(|_| StoreError::AuthFailed("token contains invalid characters".into()))?,
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        Ok(headers)
    }

    /// Map a non-success response to a `StoreError`.
    async fn error_from_response(response: Response, status: StatusCode) -> StoreError {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                StoreError::AuthFailed("invalid or expired token".into())
            }
            _ => StoreError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl WaitlistStore for SheetsStore {
    fn name(&self) -> &'static str {
        "sheets"
    }

    async fn load(&self) -> Result<WaitlistState, StoreError> {
        let response = self
            .client
            .get(self.values_url())
            .headers(self.headers()?)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| StoreError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_response(response, status).await);
        }

        let range: ValueRange = response.json().await.map_err(|e| {
            StoreError::ParseError(format!("failed to parse values response: {}", e))
        })?;

        Ok(decode_rows(&range.values))
    }

    async fn save(&self, state: &WaitlistState) -> Result<(), StoreError> {
        let body = ValueRange {
            values: encode_rows(state),
        };

        let response = self
            .client
            .put(self.values_url())
            .query(&[("valueInputOption", "RAW")])
            .headers(self.headers()?)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_response(response, status).await);
        }

        Ok(())
    }
}

// ============================================================================
// Row layout
// ============================================================================

/// The values payload of the Sheets API.
#[derive(Debug, Serialize, Deserialize)]
struct ValueRange {
    /// Omitted entirely by the API when the range is empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    values: Vec<Vec<String>>,
}

/// Encode a waitlist state into the sheet's row layout.
fn encode_rows(state: &WaitlistState) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(state.emails.len() + 2);
    rows.push(vec!["Email".to_string(), "Count".to_string()]);
    // Count lives in B2; A2 stays empty.
    rows.push(vec![String::new(), state.count.to_string()]);
    for email in &state.emails {
        rows.push(vec![email.clone(), String::new()]);
    }
    rows
}

/// Decode sheet rows into a waitlist state.
///
/// Emails are the non-empty column-A cells below the header; the count
/// comes from B2, falling back to the seeded baseline when the cell is
/// absent or not a number.
fn decode_rows(rows: &[Vec<String>]) -> WaitlistState {
    let emails: Vec<String> = rows
        .iter()
        .skip(1)
        .filter_map(|row| row.first())
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .map(|cell| cell.to_string())
        .collect();

    let count = rows
        .get(1)
        .and_then(|row| row.get(1))
        .and_then(|cell| cell.trim().parse::<u32>().ok())
        .unwrap_or(SEED_COUNT);

    WaitlistState { emails, count }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let state = WaitlistState {
            emails: vec!["a@b.com".to_string(), "c@d.com".to_string()],
            count: 4,
        };

        let rows = encode_rows(&state);
        assert_eq!(decode_rows(&rows), state);
    }

    #[test]
    fn encode_layout_matches_sheet_shape() {
        let state = WaitlistState {
            emails: vec!["a@b.com".to_string()],
            count: 3,
        };
        let rows = encode_rows(&state);

        assert_eq!(rows[0], vec!["Email", "Count"]);
        assert_eq!(rows[1], vec!["", "3"]);
        assert_eq!(rows[2], vec!["a@b.com", ""]);
    }

    #[test]
    fn decode_empty_sheet_is_default() {
        assert_eq!(decode_rows(&[]), WaitlistState::default());
    }

    #[test]
    fn decode_header_only_is_default() {
        let rows = vec![vec!["Email".to_string(), "Count".to_string()]];
        assert_eq!(decode_rows(&rows), WaitlistState::default());
    }

    #[test]
    fn decode_unparseable_count_falls_back_to_seed() {
        let rows = vec![
            vec!["Email".to_string(), "Count".to_string()],
            vec![String::new(), "garbage".to_string()],
            vec!["a@b.com".to_string(), String::new()],
        ];
        let state = decode_rows(&rows);
        assert_eq!(state.count, SEED_COUNT);
        assert_eq!(state.emails, vec!["a@b.com".to_string()]);
    }

    #[test]
    fn decode_skips_blank_email_cells() {
        let rows = vec![
            vec!["Email".to_string(), "Count".to_string()],
            vec![String::new(), "5".to_string()],
            vec!["a@b.com".to_string()],
            vec!["  ".to_string()],
            vec!["c@d.com".to_string()],
        ];
        let state = decode_rows(&rows);
        assert_eq!(
            state.emails,
            vec!["a@b.com".to_string(), "c@d.com".to_string()]
        );
        assert_eq!(state.count, 5);
    }

    #[test]
    fn decode_preserves_row_order() {
        let rows = vec![
            vec!["Email".to_string(), "Count".to_string()],
            vec![String::new(), "4".to_string()],
            vec!["first@x.com".to_string()],
            vec!["second@x.com".to_string()],
        ];
        let state = decode_rows(&rows);
        assert_eq!(state.emails[0], "first@x.com");
        assert_eq!(state.emails[1], "second@x.com");
    }

    #[test]
    fn values_url_shape() {
        let store = SheetsStore::with_api_base("sheet-123", "tok", "http://localhost:8080");
        assert_eq!(
            store.values_url(),
            "http://localhost:8080/v4/spreadsheets/sheet-123/values/Sheet1!A:B"
        );
    }

    #[test]
    fn debug_does_not_leak_token() {
        let store = SheetsStore::new("sheet-123", "super-secret");
        let debug = format!("{:?}", store);
        assert!(!debug.contains("super-secret"));
    }
}
