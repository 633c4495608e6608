//! Error types for the Txerpa API client.
//!
//! # Design
//! Every non-200 response becomes a `DomainError` carrying the status and a
//! diagnostic message. Search-style operations recover the 404 case into an
//! empty result before it reaches the caller, so a `DomainError` that escapes
//! the gateway is always a real failure. `GatewayError` adds the failures that
//! never produced a response or whose 200 body was unusable.

use thiserror::Error;

use crate::http::TransportError;

/// A non-200 response from the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DomainError {
    message: String,
    status: u16,
}

impl DomainError {
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The HTTP status that triggered this error.
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Errors returned by `ApiGateway` operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The server answered with a status other than 200.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The transport could not complete the round trip.
    #[error("transport failed: {0}")]
    Transport(#[source] TransportError),

    /// A 200 response body did not have the expected JSON shape.
    #[error("failed to decode response body: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The request payload could not be encoded as JSON.
    #[error("failed to encode request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A required field was missing from the input; no request was sent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
}

impl GatewayError {
    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Domain(err) => Some(err.status()),
            _ => None,
        }
    }

    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            GatewayError::Domain(err) => Some(err),
            _ => None,
        }
    }
}

/// Errors raised while loading credentials.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid base URL '{0}': must start with http:// or https://")]
    InvalidBaseUrl(String),
}
