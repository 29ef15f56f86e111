//! Typed error hierarchy for the freebox-client crate.
//!
//! `FbxError` gives every failure boundary in the system its own variant so
//! callers can:
//! - Distinguish the failure category (handshake, API envelope, missing
//!   resource, transport, parse, credential files).
//! - Inspect the original cause via `source()` (thiserror derives this
//!   from `#[from]`/`#[source]` fields).
//! - Display a message that carries the relevant context (server error code,
//!   HTTP status, resource kind and id).
//!
//! Design rationale:
//! - The Freebox API reports most failures inside a `200 OK` body as
//!   `{"success": false, "error_code": ...}`, so `Auth` and `Api` carry the
//!   server-supplied code rather than an HTTP status.
//! - `Http` preserves the raw response body for the rare non-2xx replies —
//!   discarding it would lose the router's diagnostic text.
//! - `Network` wraps `reqwest::Error` for transport-level failures (DNS,
//!   TCP, TLS) where no response was received at all.

use reqwest::StatusCode;

/// Unified error type for all freebox-client operations.
#[derive(Debug, thiserror::Error)]
pub enum FbxError {
    /// The authentication handshake failed — either the challenge fetch or
    /// the session exchange came back with `success: false`.
    ///
    /// `code` is the server-supplied error code (e.g. `invalid_token`,
    /// `auth_required`). A handshake failure is fatal: there is no degraded
    /// mode and no retry.
    #[error("authentication failed: {code}")]
    Auth {
        /// Error code reported by the router (`unknown` if absent).
        code: String,
    },

    /// The API reported a failure envelope (`success: false`) on a
    /// non-handshake call.
    ///
    /// Carries the server error code and its human-readable message when
    /// present. Distinct from `Http`: the HTTP exchange itself succeeded.
    #[error("API error {code}: {message}")]
    Api {
        /// Error code from the response envelope (`unknown` if absent).
        code: String,
        /// The router's `msg` field, or an empty string.
        message: String,
    },

    /// An item lookup referenced an id the router does not know.
    ///
    /// Produced when an item-level GET/PUT/DELETE returns HTTP 404 or the
    /// `noent` envelope code.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Resource kind, e.g. `"contact"` or `"static lease"`.
        kind: &'static str,
        /// The id that was requested.
        id: String,
    },

    /// The router returned a non-2xx HTTP status outside the cases mapped
    /// to `NotFound`. The body is preserved because it may carry diagnostic
    /// text that `error_for_status()` would discard.
    #[error("HTTP error {status}: {body}")]
    Http {
        /// The HTTP status code.
        status: StatusCode,
        /// Raw response body (may be empty if unreadable).
        body: String,
    },

    /// JSON (de)serialization failed — unexpected response shape.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Transport-level failure (DNS, TCP, TLS, timeout). No HTTP status is
    /// available because the request did not complete.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Reading or writing a credential document on disk failed.
    #[error("credential file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, FbxError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn auth_error_displays_server_code() {
        let err = FbxError::Auth {
            code: "invalid_token".to_string(),
        };
        let msg = err.to_string();
        assert!(
            msg.contains("invalid_token"),
            "display should include the server error code"
        );
        assert!(
            msg.contains("authentication failed"),
            "display should indicate an auth failure"
        );
    }

    #[test]
    fn api_error_preserves_code_and_message() {
        let err = FbxError::Api {
            code: "insufficient_rights".to_string(),
            message: "You don't have the required permission".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("insufficient_rights"));
        assert!(msg.contains("required permission"));
    }

    #[test]
    fn not_found_names_kind_and_id() {
        let err = FbxError::NotFound {
            kind: "contact",
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "contact 42 not found");
    }

    #[test]
    fn http_error_preserves_status_and_body() {
        let err = FbxError::Http {
            status: StatusCode::FORBIDDEN,
            body: r#"{"msg":"forbidden"}"#.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"), "display should include the status");
        assert!(msg.contains("forbidden"), "display should include the body");
    }

    #[test]
    fn parse_error_chains_to_serde_json() {
        let json_err: serde_json::Error = serde_json::from_str::<String>("not-json").unwrap_err();
        let err = FbxError::Parse(json_err);
        assert!(
            err.source().is_some(),
            "Parse variant should chain to serde_json::Error"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        // FbxError must be Send + Sync for use across async task boundaries.
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FbxError>();
    }
}
