//! Error types for panel API operations
//!
//! Closed taxonomy: every failure a caller can see is one of these kinds,
//! distinguishable by variant rather than by message content. Server error
//! payloads are mapped onto these variants in `detail.rs`.

use reqwest::StatusCode;

use crate::session::SessionState;

/// Errors from panel client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Client construction rejected the base URL or configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// `open()` or `close()` called from a state that forbids it.
    #[error("{reason} (current state: {from})")]
    InvalidLifecycleTransition {
        from: SessionState,
        reason: &'static str,
    },

    /// Operation attempted after the session was closed.
    #[error("connection is closed")]
    ConnectionClosed,

    /// Bearer-gated operation attempted with no token held.
    #[error("no bearer token held, authenticate first")]
    AuthenticationRequired,

    /// The authenticate operation was rejected by the server (HTTP 401).
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The server reported the entity already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The server reported the entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server rejected the caller's privileges.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The server rejected the request body field-by-field.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// The server echoed an identity field inconsistent with the request.
    #[error("response integrity: server answered for {actual:?}, request was for {expected:?}")]
    ResponseIntegrity { expected: String, actual: String },

    /// A required field was absent or mistyped in a successful response.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Any other non-success status, with the raw body for diagnostics.
    #[error("unexpected server response {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    /// The underlying HTTP client failed (connect, timeout, body I/O).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Result alias for panel client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_context() {
        let config_err = Error::Config("timeout must be greater than 0".into());
        assert_eq!(
            config_err.to_string(),
            "configuration error: timeout must be greater than 0"
        );

        let lifecycle_err = Error::InvalidLifecycleTransition {
            from: SessionState::Closed,
            reason: "cannot reopen the connection once it is closed",
        };
        assert_eq!(
            lifecycle_err.to_string(),
            "cannot reopen the connection once it is closed (current state: closed)"
        );
    }

    #[test]
    fn unexpected_status_display_carries_status_and_body() {
        let err = Error::UnexpectedStatus {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream blew up".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("502"), "got: {msg}");
        assert!(msg.contains("upstream blew up"), "got: {msg}");
    }

    #[test]
    fn response_integrity_display_names_both_entities() {
        let err = Error::ResponseIntegrity {
            expected: "kozma".into(),
            actual: "prutkov".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("kozma"), "got: {msg}");
        assert!(msg.contains("prutkov"), "got: {msg}");
    }

    #[test]
    fn error_debug_includes_variant() {
        let err = Error::AuthenticationRequired;
        let debug = format!("{err:?}");
        assert!(
            debug.contains("AuthenticationRequired"),
            "Debug should include variant name, got: {debug}"
        );
    }
}
