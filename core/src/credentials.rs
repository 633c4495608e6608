//! Account credentials and base URL for the remote API.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::CredentialsError;

pub const DEFAULT_BASE_URL: &str = "http://api.txerpa.com/api";

pub const ENV_USERNAME: &str = "TXERPA_USERNAME";
pub const ENV_PASSWORD: &str = "TXERPA_PASSWORD";
pub const ENV_BASE_URL: &str = "TXERPA_BASE_URL";

/// Username, password and base URL for one API session.
///
/// Immutable once built. `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
    base_url: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, CredentialsError> {
        let base_url = base_url.trim_end_matches('/');
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CredentialsError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            username: username.into(),
            password: password.into(),
            base_url: base_url.to_string(),
        })
    }

    /// Read `TXERPA_USERNAME`, `TXERPA_PASSWORD` and optionally
    /// `TXERPA_BASE_URL` from the process environment.
    pub fn from_env() -> Result<Self, CredentialsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like `from_env`, after loading a `.env` file if one is present.
    pub fn from_dotenv() -> Result<Self, CredentialsError> {
        if let Err(err) = dotenvy::dotenv() {
            tracing::debug!(error = %err, "no .env file loaded");
        }
        Self::from_env()
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CredentialsError> {
        let username = lookup(ENV_USERNAME).ok_or(CredentialsError::MissingVar(ENV_USERNAME))?;
        let password = lookup(ENV_PASSWORD).ok_or(CredentialsError::MissingVar(ENV_PASSWORD))?;
        let base_url = lookup(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(username, password, &base_url)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Value for the `Authorization` header.
    pub fn basic_auth(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
