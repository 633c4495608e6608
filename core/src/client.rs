//! Request dispatch and outcome classification for the Txerpa API.
//!
//! # Design
//! `ApiGateway` holds the session credentials and an injected `Transport`.
//! Every operation funnels through [`ApiGateway::request`]: the request is
//! built as plain data (`build_request`), executed by the transport, and the
//! response is classified (`check_status`). Only status 200 counts as
//! success; anything else becomes a `DomainError` whose message carries
//! enough of the exchange to diagnose it from a log line.
//!
//! The per-resource operations live in `resources.rs`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::credentials::Credentials;
use crate::error::{DomainError, GatewayError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, CONTENT_TYPE_JSON};

/// Data attached to a request.
///
/// GET sends query pairs; POST and PUT send a JSON body; other verbs pass
/// the data through as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Query(Vec<(String, String)>),
    Json(Value),
}

impl Payload {
    /// The `key`/`q` filter used by every search endpoint.
    pub fn filter(key: &str, q: &str) -> Self {
        Payload::Query(vec![
            ("key".to_string(), key.to_string()),
            ("q".to_string(), q.to_string()),
        ])
    }

    fn query_pairs(&self) -> Vec<(String, String)> {
        match self {
            Payload::Query(pairs) => pairs.clone(),
            Payload::Json(Value::Object(map)) => map
                .iter()
                .map(|(key, value)| {
                    let value = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (key.clone(), value)
                })
                .collect(),
            Payload::Json(_) | Payload::Empty => Vec::new(),
        }
    }

    fn json_body(&self) -> Result<Option<String>, GatewayError> {
        let body = match self {
            Payload::Empty => return Ok(None),
            Payload::Json(value) => serde_json::to_string(value),
            Payload::Query(pairs) => {
                let map: serde_json::Map<String, Value> = pairs
                    .iter()
                    .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                    .collect();
                serde_json::to_string(&map)
            }
        };
        body.map(Some).map_err(GatewayError::Serialization)
    }
}

/// Synchronous gateway to the Txerpa REST API.
///
/// Holds immutable state only; sequential calls may reuse one instance.
#[derive(Debug, Clone)]
pub struct ApiGateway<T> {
    credentials: Credentials,
    transport: T,
}

impl<T: Transport> ApiGateway<T> {
    pub fn new(credentials: Credentials, transport: T) -> Self {
        Self {
            credentials,
            transport,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Describe the HTTP call for `method` on the base-relative `path`.
    ///
    /// Verb names are case-insensitive: `Other("post")` is sent as a POST.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &Payload,
    ) -> Result<HttpRequest, GatewayError> {
        let method = method.normalized();
        let mut headers = vec![("Authorization".to_string(), self.credentials.basic_auth())];
        let (query, body) = match method {
            HttpMethod::Get => (payload.query_pairs(), None),
            HttpMethod::Post | HttpMethod::Put => {
                headers.push(("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()));
                (Vec::new(), payload.json_body()?)
            }
            HttpMethod::Other(_) => match payload {
                Payload::Query(pairs) => (pairs.clone(), None),
                Payload::Json(_) | Payload::Empty => (Vec::new(), payload.json_body()?),
            },
        };
        Ok(HttpRequest {
            method,
            url: format!("{}{path}", self.credentials.base_url()),
            query,
            headers,
            body,
        })
    }

    /// Execute one call and require status 200.
    pub fn request(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Payload,
    ) -> Result<HttpResponse, GatewayError> {
        let request = self.build_request(method, path, &payload)?;
        tracing::debug!(method = %request.method, path, "dispatching request");
        let response = self
            .transport
            .execute(&request)
            .map_err(GatewayError::Transport)?;
        check_status(&request.method, path, request.body.as_deref(), &response)?;
        Ok(response)
    }

    pub(crate) fn get(&self, path: &str, payload: Payload) -> Result<HttpResponse, GatewayError> {
        self.request(HttpMethod::Get, path, payload)
    }

    pub(crate) fn post(&self, path: &str, body: Value) -> Result<HttpResponse, GatewayError> {
        self.request(HttpMethod::Post, path, Payload::Json(body))
    }

    pub(crate) fn put(&self, path: &str, body: Value) -> Result<HttpResponse, GatewayError> {
        self.request(HttpMethod::Put, path, Payload::Json(body))
    }
}

/// Map any status other than 200 to a `DomainError`.
pub(crate) fn check_status(
    method: &HttpMethod,
    path: &str,
    request_body: Option<&str>,
    response: &HttpResponse,
) -> Result<(), DomainError> {
    if response.status == 200 {
        return Ok(());
    }
    tracing::warn!(status = response.status, %method, path, "request failed");
    Err(DomainError::new(
        failure_message(method, path, request_body, &response.body),
        response.status,
    ))
}

fn failure_message(
    method: &HttpMethod,
    path: &str,
    request_body: Option<&str>,
    response_body: &str,
) -> String {
    let mut message = format!("{method}: {path}\n");
    if *method == HttpMethod::Post {
        let data = request_body.unwrap_or_default().replace("\\\"", "\"");
        message.push_str(&format!("POST_DATA: {data}\n"));
    }
    message.push_str("Response body:\n");
    message.push_str(response_body);
    message
}

/// Turn a 404 into `fallback`; every other outcome passes through.
pub(crate) fn not_found_as<R>(
    result: Result<R, GatewayError>,
    fallback: impl FnOnce() -> R,
) -> Result<R, GatewayError> {
    match result {
        Err(GatewayError::Domain(err)) if err.is_not_found() => {
            tracing::debug!("not found, returning empty result");
            Ok(fallback())
        }
        other => other,
    }
}

pub(crate) fn decode<D: DeserializeOwned>(response: &HttpResponse) -> Result<D, GatewayError> {
    serde_json::from_str(&response.body).map_err(GatewayError::Deserialization)
}
