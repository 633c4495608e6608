//! HTTP transport types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. `ApiGateway` builds an
//! `HttpRequest`, hands it to an injected `Transport`, and classifies the
//! returned `HttpResponse`. The transport owns sockets, TLS and timeouts; the
//! gateway owns verbs, paths, encoding and status interpretation. Tests swap
//! in a recording transport and never touch the network.

use std::error::Error;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Error raised by a transport when no HTTP response could be obtained.
///
/// The gateway does not classify these; they surface unchanged as the source
/// of `GatewayError::Transport`.
pub type TransportError = Box<dyn Error + Send + Sync + 'static>;

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// HTTP method for a request.
///
/// `Other` is the escape hatch for verbs the API does not use today; its
/// payload is passed through without JSON handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Other(String),
}

impl HttpMethod {
    /// Uppercase `verb` and map the verbs the API knows to their variants.
    pub fn parse(verb: &str) -> Self {
        let verb = verb.trim().to_ascii_uppercase();
        match verb.as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            _ => HttpMethod::Other(verb),
        }
    }

    /// Collapse an `Other` that spells GET, POST or PUT into the typed variant.
    pub fn normalized(self) -> Self {
        match self {
            HttpMethod::Other(verb) => HttpMethod::parse(&verb),
            known => known,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Other(verb) => verb,
        }
    }
}

impl FromStr for HttpMethod {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(HttpMethod::parse(s))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute (base URL plus the operation path). `query` is only
/// populated for GET-style filters; `body` only for POST/PUT or a
/// pass-through payload on other verbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// `url` with the query pairs percent-encoded and appended.
    pub fn url_with_query(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let pairs: Vec<String> = self
            .query
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect();
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{separator}{}", self.url, pairs.join("&"))
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

/// Executes one HTTP round trip.
///
/// Implementations must return non-2xx statuses as `Ok(HttpResponse)`; only
/// failures that produce no response at all (DNS, connect, timeout) are
/// `Err`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
