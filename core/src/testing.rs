//! Recording transport for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::client::ApiGateway;
use crate::credentials::Credentials;
use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};

pub(crate) const BASE_URL: &str = "http://localhost:3000/api";

/// Replays canned responses in order and records every request it sees.
#[derive(Debug, Default)]
pub(crate) struct StubTransport {
    replies: RefCell<VecDeque<Result<HttpResponse, String>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, status: u16, body: &str) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub(crate) fn fail(self, reason: &str) -> Self {
        self.replies.borrow_mut().push_back(Err(reason.to_string()));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests
            .borrow()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

impl Transport for StubTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        match self.replies.borrow_mut().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(reason)) => Err(reason.into()),
            None => Err("no canned response left".into()),
        }
    }
}

pub(crate) fn gateway(stub: StubTransport) -> ApiGateway<StubTransport> {
    let credentials = Credentials::new("user", "secret", BASE_URL).expect("valid test credentials");
    ApiGateway::new(credentials, stub)
}
