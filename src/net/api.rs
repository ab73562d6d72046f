//! Typed helpers for the identity service endpoints.
//!
//! ERROR HANDLING
//! ==============
//! Each helper passes its own fallback message to the transport so a failure
//! without a server message still reads naturally. `/auth/*` envelopes with
//! `success: false` are turned into `ApiErrorKind::Rejected` here, so callers
//! only ever branch on `Result`.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use super::transport::{Method, Transport};
use super::types::{AuthResponse, Credentials, HomeData, PublicInfo, SignupPayload, User};

const SIGNUP_PATH: &str = "/auth/signup";
const LOGIN_PATH: &str = "/auth/login";
const LOGOUT_PATH: &str = "/auth/logout";
const ME_PATH: &str = "/auth/me";
const HOME_PATH: &str = "/home";
const PUBLIC_INFO_PATH: &str = "/public/info";

const SIGNUP_FAILED: &str = "Sign-up failed.";
const LOGIN_FAILED: &str = "Login failed.";
const LOGOUT_FAILED: &str = "Logout failed.";
const CURRENT_USER_FAILED: &str = "Could not load the current user.";
const HOME_FAILED: &str = "Could not load home data.";
const PUBLIC_INFO_FAILED: &str = "Could not load public information.";
const SIGNUP_SUCCEEDED: &str = "Sign-up complete.";

#[derive(Clone)]
pub struct AuthApi {
    transport: Rc<Transport>,
}

impl AuthApi {
    pub fn new(transport: Rc<Transport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Rc<Transport> {
        &self.transport
    }

    /// `POST /auth/signup`. Returns the server's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the server declines.
    pub async fn signup(&self, payload: &SignupPayload) -> Result<String, ApiError> {
        let body = to_body(payload)?;
        let resp = self.auth_call(Method::Post, SIGNUP_PATH, Some(body), SIGNUP_FAILED).await?;
        Ok(resp.message.unwrap_or_else(|| SIGNUP_SUCCEEDED.to_owned()))
    }

    /// `POST /auth/login`. The backend sets the session cookie on success.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the credentials are rejected or the request fails.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let body = to_body(credentials)?;
        let resp = self.auth_call(Method::Post, LOGIN_PATH, Some(body), LOGIN_FAILED).await?;
        resp.user.ok_or_else(|| ApiError::transport(LOGIN_FAILED))
    }

    /// `POST /auth/logout`. The backend clears the session cookie.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.transport.send_with_fallback(Method::Post, LOGOUT_PATH, None, LOGOUT_FAILED).await?;
        Ok(())
    }

    /// `GET /auth/me`: the user owning the current session cookie.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when there is no active session or the request fails.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let resp = self.auth_call(Method::Get, ME_PATH, None, CURRENT_USER_FAILED).await?;
        resp.user.ok_or_else(|| ApiError::rejected(None, CURRENT_USER_FAILED))
    }

    /// `GET /home`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the body is malformed.
    pub async fn home(&self) -> Result<HomeData, ApiError> {
        self.get_json(HOME_PATH, HOME_FAILED).await
    }

    /// `GET /public/info`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the body is malformed.
    pub async fn public_info(&self) -> Result<PublicInfo, ApiError> {
        self.get_json(PUBLIC_INFO_PATH, PUBLIC_INFO_FAILED).await
    }

    async fn auth_call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        fallback: &str,
    ) -> Result<AuthResponse, ApiError> {
        let value = self.transport.send_with_fallback(method, path, body, fallback).await?;
        let resp: AuthResponse = from_body(value, fallback)?;
        if !resp.success {
            return Err(ApiError::rejected(None, resp.message.unwrap_or_else(|| fallback.to_owned())));
        }
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<T, ApiError> {
        let value = self.transport.send_with_fallback(Method::Get, path, None, fallback).await?;
        from_body(value, fallback)
    }
}

fn to_body<T: serde::Serialize>(payload: &T) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(|e| ApiError::transport(format!("could not encode request: {e}")))
}

fn from_body<T: DeserializeOwned>(value: Value, fallback: &str) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| {
        log::warn!("unexpected response shape: {e}");
        ApiError::transport(fallback)
    })
}
