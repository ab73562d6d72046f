//! Request transport: credential attachment, body sanitization, and response
//! classification for every backend call.
//!
//! ARCHITECTURE
//! ============
//! `Transport` owns the policy and delegates the raw exchange to an
//! [`HttpClient`]. The browser client attaches the session cookie on every
//! request (`credentials: include`); test doubles script responses.
//!
//! A 401 whose message carries an expiry indicator is reported twice: once to
//! the caller as `ApiErrorKind::SessionExpired`, and once to the registered
//! expiry handler. The handler is the only side channel; the transport never
//! touches session state or navigation itself.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;

use super::error::{ApiError, DEFAULT_ERROR_MESSAGE};
use super::sanitize::sanitize;
use crate::config::ClientConfig;

const UNAUTHORIZED: u16 = 401;
const MALFORMED_RESPONSE_MESSAGE: &str = "The server sent a response that could not be read.";
const NETWORK_ERROR_MESSAGE: &str = "Could not reach the server. Check your connection.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A fully-resolved request handed to the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireRequest {
    pub method: Method,
    pub url: String,
    /// Serialized JSON body, already sanitized.
    pub body: Option<String>,
}

/// Raw status and body text of a received response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireResponse {
    pub status: u16,
    pub body: String,
}

/// The exchange never produced a response (offline, CORS, aborted).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("network error: {0}")]
pub struct WireError(pub String);

/// Raw HTTP exchange. Implementations must send the session cookie.
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    /// Perform one request.
    ///
    /// # Errors
    ///
    /// Returns a [`WireError`] when no response was received.
    async fn execute(&self, request: WireRequest) -> Result<WireResponse, WireError>;
}

/// Callback invoked once per session-expired response.
pub type ExpiryHandler = Rc<dyn Fn(&ApiError)>;

pub struct Transport {
    config: ClientConfig,
    client: Rc<dyn HttpClient>,
    expiry_handler: RefCell<Option<ExpiryHandler>>,
}

impl Transport {
    pub fn new(config: ClientConfig, client: Rc<dyn HttpClient>) -> Self {
        Self { config, client, expiry_handler: RefCell::new(None) }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Register the expiry handler, replacing any previous one.
    pub fn set_expiry_handler(&self, handler: ExpiryHandler) {
        *self.expiry_handler.borrow_mut() = Some(handler);
    }

    pub fn clear_expiry_handler(&self) {
        self.expiry_handler.borrow_mut().take();
    }

    /// Send a request and return the parsed success body.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] for network failures, unreadable bodies, and
    /// every non-2xx status.
    pub async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.send_with_fallback(method, path, body, DEFAULT_ERROR_MESSAGE).await
    }

    /// Like [`Transport::send`], using `fallback` when the server gives no message.
    ///
    /// # Errors
    ///
    /// See [`Transport::send`].
    pub async fn send_with_fallback(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        fallback: &str,
    ) -> Result<Value, ApiError> {
        let body = body
            .map(|value| serde_json::to_string(&sanitize(value)))
            .transpose()
            .map_err(|e| ApiError::transport(format!("could not encode request: {e}")))?;
        let request = WireRequest { method, url: self.config.endpoint(path), body };

        log::debug!("{} {}", method.as_str(), request.url);
        let response = self.client.execute(request).await.map_err(|e| {
            log::warn!("{} {path} failed: {e}", method.as_str());
            ApiError::transport(NETWORK_ERROR_MESSAGE)
        })?;

        let result = classify_response(&self.config, response.status, &response.body, fallback);
        if let Err(err) = &result {
            if err.is_session_expired() {
                log::warn!("{} {path}: session expired", method.as_str());
                self.notify_expired(err);
            }
        }
        result
    }

    fn notify_expired(&self, err: &ApiError) {
        let handler = self.expiry_handler.borrow().clone();
        if let Some(handler) = handler {
            handler(err);
        }
    }
}

/// Map a raw response onto the success body or a normalized error.
///
/// # Errors
///
/// Returns an [`ApiError`] for non-2xx statuses and unreadable 2xx bodies.
pub fn classify_response(config: &ClientConfig, status: u16, body: &str, fallback: &str) -> Result<Value, ApiError> {
    if (200..300).contains(&status) {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(body).map_err(|_| ApiError::transport(MALFORMED_RESPONSE_MESSAGE));
    }

    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let server_message = server_message(&parsed);
    let message = server_message.clone().unwrap_or_else(|| non_empty_or_default(fallback));
    let field_errors = field_errors(&parsed);

    let err = if status == UNAUTHORIZED {
        if server_message.as_deref().is_some_and(|m| config.is_expiry_message(m)) {
            ApiError::session_expired(message)
        } else {
            ApiError::auth_failure(message)
        }
    } else {
        ApiError::rejected(Some(status), message)
    };
    Err(err.with_field_errors(field_errors))
}

fn non_empty_or_default(fallback: &str) -> String {
    if fallback.trim().is_empty() { DEFAULT_ERROR_MESSAGE.to_owned() } else { fallback.to_owned() }
}

fn server_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_owned)
}

fn field_errors(body: &Value) -> BTreeMap<String, String> {
    ["errors", "fieldErrors"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_object))
        .map(|map| {
            map.iter()
                .filter_map(|(field, msg)| msg.as_str().map(|m| (field.clone(), m.to_owned())))
                .collect()
        })
        .unwrap_or_default()
}
