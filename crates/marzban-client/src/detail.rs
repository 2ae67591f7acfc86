//! Error payload classification for panel responses
//!
//! The panel reports failures as JSON objects carrying a `detail` field.
//! Business errors put one of a fixed vocabulary of strings in it; request
//! validation failures (HTTP 422) put an array of per-field errors instead.
//! Anything the vocabulary does not cover keeps the raw status and body.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::Error;

/// The panel's `detail` vocabulary. Matched exactly, never by substring.
const DETAIL_ADMIN_EXISTS: &str = "Admin already exists";
const DETAIL_NOT_ALLOWED: &str = "You're not allowed";
const DETAIL_NOT_AUTHENTICATED: &str = "Not authenticated";
const DETAIL_BAD_TOKEN: &str = "Could not validate credentials";
const DETAIL_ADMIN_NOT_FOUND: &str = "Admin not found";
const DETAIL_USER_NOT_FOUND: &str = "User not found";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Detail,
}

/// The two shapes the panel puts in `detail`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Fields(Vec<FieldError>),
}

/// One rejected field in a validation failure.
#[derive(Debug, Deserialize)]
struct FieldError {
    #[serde(default)]
    loc: Vec<serde_json::Value>,
    msg: String,
}

impl FieldError {
    /// Render as `body.username: field required`.
    fn describe(&self) -> String {
        if self.loc.is_empty() {
            return self.msg.clone();
        }
        let path = self
            .loc
            .iter()
            .map(|segment| match segment {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".");
        format!("{path}: {}", self.msg)
    }
}

/// Map a non-success response body to the error taxonomy.
///
/// Known `detail` strings map to their dedicated kinds; the server saying
/// not-authenticated maps to the same kind the local bearer gate produces,
/// so callers branch once. Array-valued `detail` becomes `ValidationFailed`
/// with the per-field messages joined. Everything else (unknown strings,
/// non-JSON bodies) is `UnexpectedStatus`.
pub fn classify(status: StatusCode, body: &str) -> Error {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return Error::UnexpectedStatus {
            status,
            body: body.to_string(),
        };
    };

    match parsed.detail {
        Detail::Message(detail) => match detail.as_str() {
            DETAIL_ADMIN_EXISTS => Error::AlreadyExists(detail),
            DETAIL_NOT_ALLOWED => Error::PermissionDenied(detail),
            DETAIL_NOT_AUTHENTICATED | DETAIL_BAD_TOKEN => Error::AuthenticationRequired,
            DETAIL_ADMIN_NOT_FOUND | DETAIL_USER_NOT_FOUND => Error::NotFound(detail),
            _ => Error::UnexpectedStatus {
                status,
                body: body.to_string(),
            },
        },
        Detail::Fields(fields) => Error::ValidationFailed(
            fields
                .iter()
                .map(FieldError::describe)
                .collect::<Vec<_>>()
                .join("; "),
        ),
    }
}
