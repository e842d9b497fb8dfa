//! api
//!
//! Framework-agnostic HTTP mapping for the registrar.
//!
//! # Design
//!
//! This layer owns the JSON wire shapes and the status-code table; it does
//! NOT own sockets or routing. An HTTP server (or the CLI, or a test)
//! decodes a request, calls a handler here, and encodes the returned
//! [`Reply`], whatever the transport.
//!
//! | Operation       | Success                                   | Failure                       |
//! |-----------------|-------------------------------------------|-------------------------------|
//! | `get_count`     | 200 `{"count": n}`                        | never fails (default state)   |
//! | `get_emails`    | 200 `{"emails": [...], "count": n}`       | never fails (default state)   |
//! | `post_register` | 200 `{"message": ..., "newCount": n}`     | 400 or 500 `{"message": ...}` |
//!
//! The read paths never fail: storage trouble degrades to the default
//! seeded state inside the registrar, so pollers always get a 200.

use serde::{Deserialize, Serialize};

use crate::core::registrar::{RegisterError, Registrar};

/// User-facing message for a malformed address.
pub const MSG_INVALID_EMAIL: &str = "Please provide a valid email address";

/// User-facing message when the quota is reached.
pub const MSG_QUOTA_EXCEEDED: &str = "Sorry, we have reached our limit of 50 premium clients";

/// User-facing message for a duplicate registration.
pub const MSG_DUPLICATE_EMAIL: &str = "This email is already registered";

/// User-facing message for persistence failures. Deliberately generic;
/// the cause is logged, not exposed.
pub const MSG_INTERNAL_ERROR: &str = "Internal server error";

/// User-facing message for a successful registration.
pub const MSG_REGISTERED: &str = "Successfully registered!";

/// A transport-agnostic HTTP reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// HTTP status code
    pub status: u16,
    /// JSON body
    pub body: serde_json::Value,
}

impl Reply {
    fn ok<T: Serialize>(body: &T) -> Self {
        Self {
            status: 200,
            body: serde_json::to_value(body).expect("reply types serialize"),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: serde_json::to_value(ErrorReply {
                message: message.to_string(),
            })
            .expect("reply types serialize"),
        }
    }
}

/// Request body of `POST /register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// The raw submitted email address.
    pub email: String,
}

/// Success body of `POST /register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterReply {
    pub message: String,
    #[serde(rename = "newCount")]
    pub new_count: u32,
}

/// Body of `GET /count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountReply {
    pub count: u32,
}

/// Body of `GET /emails`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailsReply {
    pub emails: Vec<String>,
    pub count: u32,
}

/// Failure body shared by all error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReply {
    pub message: String,
}

/// Handle `GET /count`.
///
/// Always 200; storage trouble yields the default seeded count.
pub async fn get_count(registrar: &Registrar) -> Reply {
    let state = registrar.query().await;
    Reply::ok(&CountReply { count: state.count })
}

/// Handle `GET /emails`.
///
/// Always 200; storage trouble yields the default seeded state.
pub async fn get_emails(registrar: &Registrar) -> Reply {
    let state = registrar.query().await;
    Reply::ok(&EmailsReply {
        emails: state.emails,
        count: state.count,
    })
}

/// Handle `POST /register` from a raw JSON body.
///
/// A body that is not valid JSON or lacks the `email` field is handled as
/// a malformed address (400), the same as an empty submission.
pub async fn post_register(registrar: &Registrar, body: &str) -> Reply {
    let request: RegisterRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(_) => return Reply::error(400, MSG_INVALID_EMAIL),
    };
    register(registrar, &request).await
}

/// Handle an already-decoded registration request.
pub async fn register(registrar: &Registrar, request: &RegisterRequest) -> Reply {
    match registrar.register(&request.email).await {
        Ok(new_count) => Reply::ok(&RegisterReply {
            message: MSG_REGISTERED.to_string(),
            new_count,
        }),
        Err(RegisterError::InvalidEmail(_)) => Reply::error(400, MSG_INVALID_EMAIL),
        Err(RegisterError::QuotaExceeded(_)) => Reply::error(400, MSG_QUOTA_EXCEEDED),
        Err(RegisterError::DuplicateEmail) => Reply::error(400, MSG_DUPLICATE_EMAIL),
        Err(RegisterError::Internal(err)) => {
            log::error!("registration persistence failed: {}", err);
            Reply::error(500, MSG_INTERNAL_ERROR)
        }
    }
}
