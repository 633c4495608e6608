use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub type Record = Map<String, Value>;

pub const DEFAULT_USERNAME: &str = "username";
pub const DEFAULT_PASSWORD: &str = "secret";

/// Body served for every invoice PDF.
pub const PDF_STUB: &[u8] = b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\ntrailer << /Root 1 0 R >>\n%%EOF\n";

/// In-memory state of one mock account.
#[derive(Debug)]
pub struct Store {
    clients: Vec<Record>,
    invoices: Vec<Record>,
    products: Vec<Record>,
    countries: Vec<Record>,
    fiscal_positions: Vec<Record>,
    currencies: Vec<Record>,
    next_client_id: i64,
    next_invoice_id: i64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            clients: Vec::new(),
            invoices: Vec::new(),
            products: records(json!([
                {"id": 1, "name": "Consultoría", "list_price": 50.0, "description": "Hora de consultoría"},
                {"id": 2, "name": "Mantenimiento", "list_price": 120.0, "description": "Cuota mensual"},
            ])),
            countries: records(json!([
                {"id": 1, "name": "España", "code": "ES"},
                {"id": 2, "name": "France", "code": "FR"},
                {"id": 3, "name": "Portugal", "code": "PT"},
            ])),
            fiscal_positions: records(json!([
                {"id": 1, "name": "Régimen Nacional"},
                {"id": 2, "name": "Régimen Intracomunitario"},
                {"id": 3, "name": "Régimen Extracomunitario"},
            ])),
            currencies: records(json!([
                {"id": 1, "name": "EUR", "symbol": "€"},
                {"id": 2, "name": "USD", "symbol": "$"},
            ])),
            next_client_id: 1,
            next_invoice_id: 1,
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    authorization: Arc<str>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Filter {
    pub key: Option<String>,
    pub q: Option<String>,
}

type ApiResult = Result<Json<Value>, (StatusCode, String)>;

/// Router for an account that accepts HTTP basic auth with the given
/// username and password.
pub fn app(username: &str, password: &str) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        authorization: format!("Basic {}", STANDARD.encode(format!("{username}:{password}"))).into(),
    };
    Router::new()
        .route("/client/", get(search_clients).post(create_client).put(update_client))
        .route("/client/{cif}/", get(client_by_cif))
        .route("/invoice/", get(search_invoices).post(create_invoice))
        .route("/invoice/{id}/pdf", get(invoice_pdf))
        .route("/country/", get(search_countries))
        .route("/countries/", get(all_countries))
        .route("/posiciones_fiscales/", get(search_fiscal_positions))
        .route("/monedas/", get(all_currencies))
        .layer(middleware::from_fn_with_state(state.clone(), require_basic_auth))
        .with_state(state)
}

pub async fn run(listener: TcpListener, username: &str, password: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(username, password)).await
}

async fn require_basic_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let given = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if given == Some(&*state.authorization) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(uri = %request.uri(), "rejected credentials");
        Err(StatusCode::UNAUTHORIZED)
    }
}

// --- clients ---

async fn search_clients(State(state): State<AppState>, Query(filter): Query<Filter>) -> ApiResult {
    let db = state.db.read().await;
    let clients = search(&db.clients, &filter);
    if clients.is_empty() {
        return Err(not_found("no client matches"));
    }
    Ok(Json(json!({ "clients": clients })))
}

async fn client_by_cif(State(state): State<AppState>, Path(cif): Path<String>) -> ApiResult {
    let db = state.db.read().await;
    db.clients
        .iter()
        .find(|client| {
            client
                .get("vat")
                .and_then(Value::as_str)
                .is_some_and(|vat| vat.eq_ignore_ascii_case(&cif))
        })
        .map(|client| Json(json!({ "client": client })))
        .ok_or_else(|| not_found("no client with that CIF"))
}

async fn create_client(State(state): State<AppState>, Json(input): Json<Record>) -> ApiResult {
    if input.get("name").and_then(Value::as_str).map_or(true, str::is_empty) {
        return Err(bad_request("name is required"));
    }
    let mut db = state.db.write().await;
    let id = db.next_client_id;
    db.next_client_id += 1;

    let mut client = input;
    client.insert("id".to_string(), json!(id));
    client.entry("active").or_insert(json!(true));
    client.insert("category".to_string(), json!("API TXERPA"));
    db.clients.push(client);
    Ok(Json(json!({ "id": id })))
}

async fn update_client(State(state): State<AppState>, Json(input): Json<Record>) -> ApiResult {
    let id = input
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| bad_request("id is required"))?;
    let mut db = state.db.write().await;
    let client = db
        .clients
        .iter_mut()
        .find(|client| client.get("id").and_then(Value::as_i64) == Some(id))
        .ok_or_else(|| not_found("no client with that id"))?;
    for (field, value) in input {
        client.insert(field, value);
    }
    Ok(Json(json!({ "id": id })))
}

// --- invoices ---

async fn search_invoices(State(state): State<AppState>, Query(filter): Query<Filter>) -> ApiResult {
    let db = state.db.read().await;
    let invoices = search(&db.invoices, &filter);
    if invoices.is_empty() {
        return Err(not_found("no invoice matches"));
    }
    Ok(Json(json!({ "invoices": invoices })))
}

async fn create_invoice(State(state): State<AppState>, Json(input): Json<Record>) -> ApiResult {
    let name = input
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| bad_request("name is required"))?;
    let client_id = input
        .get("client_id")
        .and_then(Value::as_i64)
        .ok_or_else(|| bad_request("client_id is required"))?;
    let lines = input
        .get("lines")
        .and_then(Value::as_array)
        .filter(|lines| !lines.is_empty())
        .ok_or_else(|| bad_request("lines is required"))?;

    let mut db = state.db.write().await;
    if !db.clients.iter().any(|c| c.get("id").and_then(Value::as_i64) == Some(client_id)) {
        return Err(bad_request("unknown client_id"));
    }
    let lines = lines
        .iter()
        .map(|line| invoice_line(&db.products, line))
        .collect::<Result<Vec<_>, _>>()?;

    let id = db.next_invoice_id;
    db.next_invoice_id += 1;
    let invoice = json!({
        "id": id,
        "number": format!("INV-{id:04}"),
        "name": name,
        "client_id": client_id,
        "origin": "API TXERPA",
        "is_paid": input.get("is_paid").and_then(Value::as_bool).unwrap_or(false),
        "lines": lines,
    });
    if let Value::Object(record) = &invoice {
        db.invoices.push(record.clone());
    }
    Ok(Json(invoice))
}

fn invoice_line(products: &[Record], line: &Value) -> Result<Value, (StatusCode, String)> {
    let product_id = line
        .get("product_id")
        .and_then(Value::as_i64)
        .ok_or_else(|| bad_request("line product_id is required"))?;
    let quantity = line
        .get("quantity")
        .and_then(Value::as_f64)
        .ok_or_else(|| bad_request("line quantity is required"))?;
    let product = products
        .iter()
        .find(|p| p.get("id").and_then(Value::as_i64) == Some(product_id))
        .ok_or_else(|| bad_request("unknown product_id"))?;

    let overridden = |field: &str, fallback: &str| {
        line.get(field)
            .cloned()
            .or_else(|| product.get(fallback).cloned())
            .unwrap_or(Value::Null)
    };
    Ok(json!({
        "product_id": product_id,
        "quantity": quantity,
        "discount": line.get("discount").cloned().unwrap_or(json!(0)),
        "note": line.get("note").cloned().unwrap_or(Value::Null),
        "name": overridden("invoice_product_name", "name"),
        "description": overridden("invoice_product_description", "description"),
        "unit_price": overridden("invoice_product_unit_price", "list_price"),
    }))
}

async fn invoice_pdf(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult {
    let db = state.db.read().await;
    if db.invoices.iter().any(|i| i.get("id").and_then(Value::as_i64) == Some(id)) {
        Ok(Json(json!({ "base64": STANDARD.encode(PDF_STUB) })))
    } else {
        Err(not_found("no invoice with that id"))
    }
}

// --- catalog ---

async fn search_countries(State(state): State<AppState>, Query(filter): Query<Filter>) -> ApiResult {
    let db = state.db.read().await;
    Ok(Json(json!({ "countries": search(&db.countries, &filter) })))
}

async fn all_countries(State(state): State<AppState>) -> ApiResult {
    let db = state.db.read().await;
    Ok(Json(json!({ "countries": db.countries })))
}

async fn search_fiscal_positions(
    State(state): State<AppState>,
    Query(filter): Query<Filter>,
) -> ApiResult {
    let db = state.db.read().await;
    let positions = search(&db.fiscal_positions, &filter);
    if positions.is_empty() {
        return Err(not_found("no fiscal position matches"));
    }
    Ok(Json(json!({ "fiscal_positions": positions })))
}

async fn all_currencies(State(state): State<AppState>) -> ApiResult {
    let db = state.db.read().await;
    Ok(Json(json!({ "monedas": db.currencies })))
}

// --- helpers ---

/// Case-insensitive substring match on `key`, except `id` which must be equal.
/// A filter without both parts matches everything.
pub fn matches(record: &Record, key: &str, q: &str) -> bool {
    let Some(value) = record.get(key) else {
        return false;
    };
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if key == "id" {
        text == q
    } else {
        text.to_lowercase().contains(&q.to_lowercase())
    }
}

fn search(records: &[Record], filter: &Filter) -> Vec<Record> {
    match (&filter.key, &filter.q) {
        (Some(key), Some(q)) => records
            .iter()
            .filter(|record| matches(record, key, q))
            .cloned()
            .collect(),
        _ => records.to_vec(),
    }
}

fn records(value: Value) -> Vec<Record> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(record) => Some(record),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn not_found(reason: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, reason.to_string())
}

fn bad_request(reason: &str) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, reason.to_string())
}
