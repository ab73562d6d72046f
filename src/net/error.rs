//! Normalized error shape for every failed backend call.
//!
//! ERROR HANDLING
//! ==============
//! Whatever went wrong (network, malformed body, rejected credentials, expired
//! session), callers see one `ApiError`. `kind` keeps the distinction so the
//! session store can react to expiry without string matching.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::collections::BTreeMap;

/// Message used when neither the backend nor the caller supplied one.
pub const DEFAULT_ERROR_MESSAGE: &str = "Request failed. Please try again.";

/// Classification of a failed request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Network failure or a body that could not be parsed.
    Transport,
    /// The backend rejected the credential (401) without declaring expiry.
    AuthFailure,
    /// A 401 whose message carries an expiry indicator.
    SessionExpired,
    /// Any other non-success reply, including `success: false` envelopes.
    Rejected,
    /// A sign-in the server accepted but the client dropped because the
    /// session was reset (expiry or logout) while it was in flight.
    Superseded,
}

/// A failed backend call, normalized at the transport boundary.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status, when a response was received at all.
    pub status: Option<u16>,
    pub message: String,
    /// Per-field messages from server-side validation.
    pub field_errors: BTreeMap<String, String>,
}

impl ApiError {
    fn new(kind: ApiErrorKind, status: Option<u16>, message: impl Into<String>) -> Self {
        Self { kind, status, message: message.into(), field_errors: BTreeMap::new() }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Transport, None, message)
    }

    pub fn auth_failure(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::AuthFailure, Some(401), message)
    }

    pub fn session_expired(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::SessionExpired, Some(401), message)
    }

    pub fn rejected(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Rejected, status, message)
    }

    /// Error returned to a sign-in whose result arrived after the session was
    /// reset underneath it (expiry or logout).
    pub fn superseded() -> Self {
        Self::new(
            ApiErrorKind::Superseded,
            None,
            "Your session changed while signing in. Please try again.",
        )
    }

    #[must_use]
    pub fn with_field_errors(mut self, field_errors: BTreeMap<String, String>) -> Self {
        self.field_errors = field_errors;
        self
    }

    pub fn is_session_expired(&self) -> bool {
        self.kind == ApiErrorKind::SessionExpired
    }

    pub fn is_superseded(&self) -> bool {
        self.kind == ApiErrorKind::Superseded
    }

    pub fn has_field_errors(&self) -> bool {
        !self.field_errors.is_empty()
    }
}
