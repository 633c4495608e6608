//! Verify gateway operations against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector names an operation, its input, the request it must produce,
//! a simulated response, and the expected result or error. Comparing parsed
//! JSON (not raw strings) avoids false negatives from field ordering.

use std::cell::RefCell;

use serde_json::Value;
use txerpa_core::{
    ApiGateway, Credentials, GatewayError, HttpMethod, HttpRequest, HttpResponse, Record,
    Transport, TransportError,
};

const BASE_URL: &str = "http://localhost:3000/api";

/// Answers every request with the same response and keeps what it was sent.
struct ReplayTransport {
    response: HttpResponse,
    seen: RefCell<Vec<HttpRequest>>,
}

impl Transport for ReplayTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.borrow_mut().push(request.clone());
        Ok(self.response.clone())
    }
}

fn gateway(simulated: &Value) -> ApiGateway<ReplayTransport> {
    let response = HttpResponse::new(
        simulated["status"].as_u64().unwrap() as u16,
        simulated["body"].as_str().unwrap(),
    );
    let transport = ReplayTransport {
        response,
        seen: RefCell::new(Vec::new()),
    };
    ApiGateway::new(Credentials::new("user", "secret", BASE_URL).unwrap(), transport)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        other => HttpMethod::Other(other.to_string()),
    }
}

fn records(list: Vec<Record>) -> Value {
    Value::Array(list.into_iter().map(Value::Object).collect())
}

fn optional_record(record: Option<Record>) -> Value {
    record.map_or(Value::Null, Value::Object)
}

fn str_input<'a>(input: &'a Value, key: &str) -> Option<&'a str> {
    input.get(key).and_then(Value::as_str)
}

/// Run the named operation and render its result as JSON.
fn run(gw: &ApiGateway<ReplayTransport>, operation: &str, input: &Value) -> Result<Value, GatewayError> {
    let field = str_input(input, "field");
    let value = str_input(input, "value");
    let id = input.get("id").and_then(Value::as_i64);
    let body = &input["body"];

    Ok(match operation {
        "client_search" => records(gw.client_search(field.unwrap(), value.unwrap())?),
        "client_by_cif" => optional_record(gw.client_by_cif(str_input(input, "cif").unwrap())?),
        "client_new" => Value::from(gw.client_new(body)?),
        "client_update" => Value::from(gw.client_update(body)?),
        "invoice_search" => records(gw.invoice_search(field.unwrap(), value.unwrap())?),
        "invoice_by_id" => optional_record(gw.invoice_by_id(id.unwrap())?),
        "invoice_new" => Value::Object(gw.invoice_new(body)?),
        "invoice_pdf" => gw.invoice_pdf(id.unwrap())?.map_or(Value::Null, Value::String),
        "product_search" => records(gw.product_search(field, value)?),
        "country_search" => records(gw.country_search(field, value)?),
        "fiscal_position_search" => {
            records(gw.fiscal_position_search(field.unwrap(), value.unwrap())?)
        }
        "currencies_all" => records(gw.currencies_all()?),
        other => panic!("unknown operation: {other}"),
    })
}

// ---------------------------------------------------------------------------
// Successful operations
// ---------------------------------------------------------------------------

#[test]
fn operation_test_vectors() {
    let raw = include_str!("../../test-vectors/operations.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let gw = gateway(&case["simulated_response"]);

        let result = run(&gw, case["operation"].as_str().unwrap(), &case["input"])
            .unwrap_or_else(|err| panic!("{name}: unexpected error: {err}"));
        assert_eq!(result, case["expected_result"], "{name}: result");

        // Verify the request that was sent
        let seen = gw.transport().seen.borrow();
        assert_eq!(seen.len(), 1, "{name}: exactly one round trip");
        let req = &seen[0];
        let expected_req = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");

        let expected_query: Vec<(String, String)> =
            serde_json::from_value(expected_req["query"].clone()).unwrap();
        assert_eq!(req.query, expected_query, "{name}: query");

        match &expected_req["body"] {
            Value::Null => assert!(req.body.is_none(), "{name}: body should be None"),
            expected => {
                let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&body, expected, "{name}: body");
                assert_eq!(req.header("content-type"), Some("application/json"), "{name}: content type");
            }
        }
        assert_eq!(req.header("authorization"), Some("Basic dXNlcjpzZWNyZXQ="), "{name}: auth");
    }
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn failure_test_vectors() {
    let raw = include_str!("../../test-vectors/failures.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let gw = gateway(&case["simulated_response"]);

        let err = run(&gw, case["operation"].as_str().unwrap(), &case["input"])
            .expect_err(name);
        let domain = err
            .as_domain()
            .unwrap_or_else(|| panic!("{name}: expected a domain error, got {err}"));
        assert_eq!(u64::from(domain.status()), case["expected_status"].as_u64().unwrap(), "{name}: status");
        assert_eq!(domain.message(), case["expected_message"].as_str().unwrap(), "{name}: message");
    }
}
