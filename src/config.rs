//! Client configuration.
//!
//! The browser has no process environment, so the API base URL is baked in
//! at build time from `AUTHGATE_API_URL` and falls back to the local
//! development backend.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Substrings that mark a 401 as "session expired" rather than "invalid".
pub const DEFAULT_EXPIRY_INDICATORS: &[&str] = &["만료", "expired"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is joined onto, without a trailing `/`.
    pub base_url: String,
    /// Lowercase markers searched for in 401 messages.
    pub expiry_indicators: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_base_url(option_env!("AUTHGATE_API_URL").unwrap_or(DEFAULT_API_BASE_URL))
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: &str) -> Self {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = if trimmed.is_empty() { DEFAULT_API_BASE_URL } else { trimmed };
        Self {
            base_url: base_url.to_owned(),
            expiry_indicators: DEFAULT_EXPIRY_INDICATORS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    #[must_use]
    pub fn with_expiry_indicators<I, S>(mut self, indicators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.expiry_indicators = indicators.into_iter().map(|s| s.as_ref().to_lowercase()).collect();
        self
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Whether a server message declares the session expired.
    pub fn is_expiry_message(&self, message: &str) -> bool {
        let lowered = message.to_lowercase();
        self.expiry_indicators
            .iter()
            .any(|indicator| !indicator.is_empty() && lowered.contains(indicator.as_str()))
    }
}
