//! Blocking `Transport` on top of `ureq`.

use std::time::Duration;

use ureq::Agent;

use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

/// `ureq` agent configured to hand back 4xx/5xx responses as data so the
/// gateway can classify them.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Give up on any request that takes longer than `timeout` end to end.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut response = match &request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (key, value) in &request.headers {
                    builder = builder.header(key, value);
                }
                for (key, value) in &request.query {
                    builder = builder.query(key, value);
                }
                builder.call()?
            }
            HttpMethod::Post | HttpMethod::Put => {
                let mut builder = if request.method == HttpMethod::Post {
                    self.agent.post(&request.url)
                } else {
                    self.agent.put(&request.url)
                };
                for (key, value) in &request.headers {
                    builder = builder.header(key, value);
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes())?,
                    None => builder.send_empty()?,
                }
            }
            HttpMethod::Other(verb) => {
                let mut builder = ureq::http::Request::builder()
                    .method(verb.as_str())
                    .uri(request.url_with_query());
                for (key, value) in &request.headers {
                    builder = builder.header(key, value);
                }
                let body = request.body.clone().unwrap_or_default().into_bytes();
                self.agent.run(builder.body(body)?)?
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string()?;
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
