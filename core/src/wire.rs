//! Response envelopes as the remote API sends them.
//!
//! List endpoints wrap records under a resource-named key, the single-client
//! endpoint under `client`, and create/update endpoints return bare objects.
//! A missing list key decodes as an empty list.

use serde::{Deserialize, Deserializer};

use crate::types::Record;

#[derive(Debug, Deserialize)]
pub(crate) struct ClientList {
    #[serde(default)]
    pub clients: Vec<Record>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SingleClient {
    #[serde(default)]
    pub client: Option<Record>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvoiceList {
    #[serde(default)]
    pub invoices: Vec<Record>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductList {
    #[serde(default)]
    pub products: Vec<Record>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountryList {
    #[serde(default)]
    pub countries: Vec<Record>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FiscalPositionList {
    #[serde(default)]
    pub fiscal_positions: Vec<Record>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrencyList {
    #[serde(default)]
    pub monedas: Vec<Record>,
}

/// Body of client create/update responses.
#[derive(Debug, Deserialize)]
pub(crate) struct AssignedId {
    #[serde(deserialize_with = "integer_or_numeric_string")]
    pub id: i64,
}

/// Ids sometimes arrive as JSON strings (`"12"`).
fn integer_or_numeric_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(i64),
        Text(String),
    }

    match Id::deserialize(deserializer)? {
        Id::Number(id) => Ok(id),
        Id::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PdfDocument {
    pub base64: Option<String>,
}
