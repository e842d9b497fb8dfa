//! store::firestore
//!
//! Document-database backend using the Firestore REST API.
//!
//! # Design
//!
//! The waitlist lives in a single document (`app-data/email-data`). Loads
//! GET the document; a 404 means no record exists yet and yields the
//! default seeded state. Saves PATCH the document, replacing both fields.
//!
//! Firestore's REST representation wraps every value in a typed envelope
//! (`stringValue`, `integerValue`, `arrayValue`); the encode/decode helpers
//! below translate between that shape and [`WaitlistState`]. Note that
//! `integerValue` is a decimal string on the wire.
//!
//! # Authentication
//!
//! Requests carry a bearer token (an OAuth2 access token for a service
//! account). Token acquisition is the credential provider's problem, not
//! this store's.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{StoreError, WaitlistStore};
use crate::core::types::{WaitlistState, RECORD_KEY};

/// Default Firestore REST API base URL.
const DEFAULT_API_BASE: &str = "https://firestore.googleapis.com/v1";

/// Collection holding the waitlist document.
const COLLECTION: &str = "app-data";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "waitroom";

/// Bound on each backend request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Firestore-backed waitlist store.
pub struct FirestoreStore {
    /// HTTP client for making requests
    client: Client,
    /// Google Cloud project id
    project_id: String,
    /// OAuth2 bearer token
    token: String,
    /// API base URL (overridable for tests)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for FirestoreStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreStore")
            .field("project_id", &self.project_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl FirestoreStore {
    /// Create a Firestore store for the given project.
    pub fn new(project_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            project_id: project_id.into(),
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Create a store against a custom API base URL.
    ///
    /// This is primarily useful for testing against a local mock server.
    pub fn with_api_base(
        project_id: impl Into<String>,
        token: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            project_id: project_id.into(),
            token: token.into(),
            api_base: api_base.into(),
        }
    }

    /// URL of the waitlist document.
    fn document_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}/{}",
            self.api_base, self.project_id, COLLECTION, RECORD_KEY
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
impl WaitlistStore for FirestoreStore {
    fn name(&self) -> &'static str {
        "firestore"
    }

    async fn load(&self) -> Result<WaitlistState, StoreError> {
        let response = self
            .client
            .get(self.document_url())
            .headers(self.headers()?)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| StoreError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            // Document doesn't exist yet.
            return Ok(WaitlistState::default());
        }
        if !status.is_success() {
            return Err(Self::error_from_response(response, status).await);
        }

        let document: FirestoreDocument = response.json().await.map_err(|e| {
            StoreError::ParseError(format!("failed to parse document response: {}", e))
        })?;

        decode_document(&document)
    }

    async fn save(&self, state: &WaitlistState) -> Result<(), StoreError> {
        let document = encode_document(state);

        let response = self
            .client
            .patch(self.document_url())
            .headers(self.headers()?)
            .timeout(REQUEST_TIMEOUT)
            .json(&document)
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
// Wire format
// ============================================================================

/// A Firestore document as sent/received over REST.
#[derive(Debug, Serialize, Deserialize)]
struct FirestoreDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fields: Option<RecordFields>,
}

/// The two fields of the waitlist record in typed-value form.
#[derive(Debug, Serialize, Deserialize)]
struct RecordFields {
    emails: ArrayField,
    count: IntegerField,
}

#[derive(Debug, Serialize, Deserialize)]
struct ArrayField {
    #[serde(rename = "arrayValue")]
    array_value: ArrayBody,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ArrayBody {
    /// Firestore omits `values` entirely for an empty array.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    values: Vec<StringField>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StringField {
    #[serde(rename = "stringValue")]
    string_value: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct IntegerField {
    /// Decimal string per the Firestore REST value encoding.
    #[serde(rename = "integerValue")]
    integer_value: String,
}

/// Encode a waitlist state into the Firestore typed-value envelope.
fn encode_document(state: &WaitlistState) -> FirestoreDocument {
    FirestoreDocument {
        fields: Some(RecordFields {
            emails: ArrayField {
                array_value: ArrayBody {
                    values: state
                        .emails
                        .iter()
                        .map(|e| StringField {
                            string_value: e.clone(),
                        })
                        .collect(),
                },
            },
            count: IntegerField {
                integer_value: state.count.to_string(),
            },
        }),
    }
}

/// Decode a Firestore document into a waitlist state.
///
/// A document with no fields decodes to the default seeded state.
fn decode_document(document: &FirestoreDocument) -> Result<WaitlistState, StoreError> {
    let Some(fields) = &document.fields else {
        return Ok(WaitlistState::default());
    };

    let emails = fields
        .emails
        .array_value
        .values
        .iter()
        .map(|v| v.string_value.clone())
        .collect();

    let count = fields.count.integer_value.parse::<u32>().map_err(|_| {
        StoreError::ParseError(format!(
            "count field is not a non-negative integer: {:?}",
            fields.count.integer_value
        ))
    })?;

    Ok(WaitlistState { emails, count })
}
