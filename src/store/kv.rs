//! store::kv
//!
//! Managed key-value backend using an Upstash-style Redis REST API.
//!
//! # Design
//!
//! The waitlist record is one key (`email-data`) whose value is the JSON
//! record itself. `GET {base}/get/{key}` returns `{"result": <string|null>}`
//! where a null result means the key does not exist (default seeded state).
//! `POST {base}/set/{key}` with the JSON record as the request body replaces
//! the value in one call.
//!
//! The record is serialized to a JSON string before storage, so the value
//! survives the REST layer's own JSON envelope unambiguously.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use super::traits::{StoreError, WaitlistStore};
use crate::core::types::{WaitlistState, RECORD_KEY};

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "waitroom";

/// Bound on each backend request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Key-value store backed by a Redis-compatible REST endpoint.
pub struct KvStore {
    /// HTTP client for making requests
    client: Client,
    /// REST endpoint base URL (e.g. `https://usw1-example.upstash.io`)
    base_url: String,
    /// Bearer token
    token: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl KvStore {
    /// Create a key-value store against the given REST endpoint.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        // Normalize: the command path is appended directly.
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
            token: token.into(),
        }
    }

    /// URL of a REST command against the record key.
    fn command_url(&self, command: &str) -> String {
        format!("{}/{}/{}", self.base_url, command, RECORD_KEY)
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

/// Reply envelope of the REST API.
#[derive(Debug, Deserialize)]
struct CommandReply {
    /// `null` when the key does not exist.
    result: Option<String>,
}

#[async_trait]
impl WaitlistStore for KvStore {
    fn name(&self) -> &'static str {
        "kv"
    }

    async fn load(&self) -> Result<WaitlistState, StoreError> {
        let response = self
            .client
            .get(self.command_url("get"))
            .headers(self.headers()?)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| StoreError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_response(response, status).await);
        }

        let reply: CommandReply = response
            .json()
            .await
            .map_err(|e| StoreError::ParseError(format!("failed to parse get reply: {}", e)))?;

        match reply.result {
            // Key doesn't exist yet.
            None => Ok(WaitlistState::default()),
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| StoreError::ParseError(format!("failed to parse stored value: {}", e))),
        }
    }

    async fn save(&self, state: &WaitlistState) -> Result<(), StoreError> {
        let value = serde_json::to_string(state)
            .map_err(|e| StoreError::WriteError(format!("cannot serialize record: {}", e)))?;

        let response = self
            .client
            .post(self.command_url("set"))
            .headers(self.headers()?)
            .timeout(REQUEST_TIMEOUT)
            .body(value)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_url_shape() {
        let store = KvStore::new("https://usw1-example.upstash.io", "tok");
        assert_eq!(
            store.command_url("get"),
            "https://usw1-example.upstash.io/get/email-data"
        );
        assert_eq!(
            store.command_url("set"),
            "https://usw1-example.upstash.io/set/email-data"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let store = KvStore::new("https://example.io/", "tok");
        assert_eq!(store.command_url("get"), "https://example.io/get/email-data");
    }

    #[test]
    fn reply_with_null_result_deserializes() {
        let reply: CommandReply = serde_json::from_str(r#"{"result": null}"#).unwrap();
        assert!(reply.result.is_none());
    }

    #[test]
    fn debug_does_not_leak_token() {
        let store = KvStore::new("https://example.io", "super-secret");
        let debug = format!("{:?}", store);
        assert!(!debug.contains("super-secret"));
    }
}
