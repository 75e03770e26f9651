//! Error types for claimdesk.
//!
//! This module provides a unified error type with explicit variants for
//! transport, protocol, response shape, authentication, input validation and
//! sync handler failures.

use std::fmt;
use thiserror::Error;

/// The unified error type for claimdesk operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network or local I/O transport errors.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Non-success HTTP status from the API.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The response body did not match the expected envelope.
    #[error("unexpected response: {0}")]
    Shape(#[from] ShapeError),

    /// Authentication errors.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Input validation errors (URL format, payload shape).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// A sync handler failed; optimistic writes have been rolled back.
    #[error(transparent)]
    Operation(#[from] OperationError),
}

impl Error {
    /// Human-readable message for surfacing in UI state.
    ///
    /// An unsuccessful envelope carrying a server message yields that message;
    /// one without a message yields `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Shape(ShapeError::Unsuccessful { message: Some(m) }) if !m.is_empty() => {
                m.clone()
            }
            Error::Shape(ShapeError::Unsuccessful { .. }) => fallback.to_string(),
            Error::Protocol(ProtocolError {
                message: Some(m), ..
            }) if !m.is_empty() => m.clone(),
            other => other.to_string(),
        }
    }

    /// Returns true if this error came from a malformed response envelope.
    pub fn is_shape(&self) -> bool {
        matches!(self, Error::Shape(_))
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// Local filesystem error (file backend).
    #[error("IO error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::Io {
            message: err.to_string(),
        }
    }
}

/// Protocol-level errors from non-success HTTP responses.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Error message from the server, if the body carried one.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }

    /// Check if the server rejected the CSRF token (Laravel uses 419).
    pub fn is_csrf_mismatch(&self) -> bool {
        self.status == 419
    }
}

/// Envelope mismatches in otherwise successful responses.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// `success` was false or missing.
    #[error("server reported failure{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Unsuccessful { message: Option<String> },

    /// `data` was missing from a wrapped response.
    #[error("response has no data")]
    MissingData,

    /// `data` was present but not an array on a list endpoint.
    #[error("expected an array of records")]
    NotAnArray,

    /// The record could not be decoded.
    #[error("could not decode record: {message}")]
    Decode { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No access token is available for the request.
    #[error("no access token")]
    MissingToken,

    /// The CSRF token could not be obtained.
    #[error("CSRF token unavailable: {reason}")]
    CsrfUnavailable { reason: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Payload was not a JSON object.
    #[error("payload must be a JSON object")]
    PayloadNotObject,

    /// Record uuid was empty.
    #[error("record uuid must not be empty")]
    EmptyUuid,

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Sync handler failures.
#[derive(Debug, Error)]
pub enum OperationError {
    /// The create call came back without a record.
    #[error("Failed to create item")]
    CreateFailed,

    /// The update call came back without a record.
    #[error("Failed to update item")]
    UpdateFailed,

    /// The delete call failed; the optimistic soft-delete was reverted.
    #[error("Failed to delete item {uuid}: {message}")]
    DeleteFailed { uuid: String, message: String },

    /// The restore call failed; the optimistic restore was reverted.
    #[error("Failed to restore item {uuid}: {message}")]
    RestoreFailed { uuid: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_errors_display_bare_message() {
        let err = Error::from(OperationError::CreateFailed);
        assert_eq!(err.to_string(), "Failed to create item");
    }

    #[test]
    fn unsuccessful_without_message_uses_fallback() {
        let err = Error::from(ShapeError::Unsuccessful { message: None });
        assert_eq!(err.user_message("Failed to fetch items"), "Failed to fetch items");
    }

    #[test]
    fn unsuccessful_with_message_prefers_server_text() {
        let err = Error::from(ShapeError::Unsuccessful {
            message: Some("Zone not found".to_string()),
        });
        assert_eq!(err.user_message("fallback"), "Zone not found");
        assert!(err.is_shape());
    }

    #[test]
    fn protocol_error_display() {
        let err = ProtocolError::new(419, Some("CSRF token mismatch.".to_string()));
        assert_eq!(err.to_string(), "HTTP 419: CSRF token mismatch.");
        assert!(err.is_csrf_mismatch());
        assert!(!err.is_auth_error());
    }
}
