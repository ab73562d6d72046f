//! Wire DTOs for the identity service REST API.
//!
//! DESIGN
//! ======
//! Field names mirror the backend's camelCase JSON so serde stays lossless.
//! Request payloads (`Credentials`, `SignupPayload`) are transient values:
//! they are built by a form, sent once, and dropped.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// An authenticated user as reported by the backend.
///
/// The client never edits a `User` in place; a new value from the server
/// replaces the old one wholesale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend row id, when the endpoint includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Login name.
    pub username: String,
    /// Display name.
    pub name: String,
    /// Contact email. `/home` omits it.
    #[serde(default)]
    pub email: String,
    /// Authorization role name (e.g. `"USER"`).
    #[serde(default)]
    pub role: String,
}

/// Username/password pair submitted to `/auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account-creation payload submitted to `/auth/signup`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SignupPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
}

impl fmt::Debug for SignupPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupPayload")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

/// Envelope returned by every `/auth/*` endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Payload of `GET /home`. Public when anonymous, personalized otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct HomeData {
    pub message: String,
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<User>,
}

/// Payload of `GET /public/info`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PublicInfo {
    pub message: String,
    /// Server time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}
