//! One method per remote operation.
//!
//! Client, invoice and fiscal-position searches, the tax-id lookup and the
//! PDF fetch treat a 404 as "nothing matched". Product, country and currency
//! listings, and every create/update, surface a 404 as an error.

use serde::Serialize;
use serde_json::Value;

use crate::client::{decode, not_found_as, ApiGateway, Payload};
use crate::error::GatewayError;
use crate::http::Transport;
use crate::types::Record;
use crate::wire::{
    AssignedId, ClientList, CountryList, CurrencyList, FiscalPositionList, InvoiceList,
    PdfDocument, ProductList, SingleClient,
};

impl<T: Transport> ApiGateway<T> {
    // ── Clients ──────────────────────────────────────────────────────────

    /// Clients whose `field` matches `value`. See [`ClientField`] for the
    /// accepted fields.
    ///
    /// [`ClientField`]: crate::types::ClientField
    pub fn client_search(
        &self,
        field: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Vec<Record>, GatewayError> {
        let found = self
            .get("/client/", Payload::filter(field.as_ref(), value.as_ref()))
            .and_then(|response| decode::<ClientList>(&response))
            .map(|list| list.clients);
        not_found_as(found, Vec::new)
    }

    /// Client with the given tax id, in `CCXXXXXXXXX` form (e.g. `ES12345678Z`).
    pub fn client_by_cif(&self, cif: &str) -> Result<Option<Record>, GatewayError> {
        let found = self
            .get(&format!("/client/{}/", urlencoding::encode(cif)), Payload::Empty)
            .and_then(|response| decode::<SingleClient>(&response))
            .map(|single| single.client);
        not_found_as(found, || None)
    }

    /// Create a client and return its new id. Only `name` is required by the
    /// server.
    pub fn client_new<C: Serialize + ?Sized>(&self, client: &C) -> Result<i64, GatewayError> {
        let body = to_json(client)?;
        let response = self.post("/client/", body)?;
        Ok(decode::<AssignedId>(&response)?.id)
    }

    /// Update an existing client. The payload must carry its `id`; without
    /// one nothing is sent.
    pub fn client_update<C: Serialize + ?Sized>(&self, client: &C) -> Result<i64, GatewayError> {
        let body = to_json(client)?;
        if body.get("id").map_or(true, Value::is_null) {
            return Err(GatewayError::MissingField("id"));
        }
        let response = self.put("/client/", body)?;
        Ok(decode::<AssignedId>(&response)?.id)
    }

    // ── Invoices ─────────────────────────────────────────────────────────

    /// Invoices whose `field` matches `value`. See [`InvoiceField`] for the
    /// accepted fields.
    ///
    /// [`InvoiceField`]: crate::types::InvoiceField
    pub fn invoice_search(
        &self,
        field: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Vec<Record>, GatewayError> {
        let found = self
            .get("/invoice/", Payload::filter(field.as_ref(), value.as_ref()))
            .and_then(|response| decode::<InvoiceList>(&response))
            .map(|list| list.invoices);
        not_found_as(found, Vec::new)
    }

    pub fn invoice_by_id(&self, id: i64) -> Result<Option<Record>, GatewayError> {
        let invoices = self.invoice_search("id", id.to_string())?;
        Ok(invoices.into_iter().next())
    }

    /// Create an invoice from `name`, `client_id` and `lines` (each line
    /// needs `product_id` and `quantity`). Returns the created record as the
    /// server sent it, including `id` and `number`.
    pub fn invoice_new<I: Serialize + ?Sized>(&self, invoice: &I) -> Result<Record, GatewayError> {
        let body = to_json(invoice)?;
        let response = self.post("/invoice/", body)?;
        decode(&response)
    }

    /// The invoice PDF as a base64 string, or `None` when the server has no
    /// document for `id`. The string is returned undecoded.
    pub fn invoice_pdf(&self, id: i64) -> Result<Option<String>, GatewayError> {
        let found = self
            .get(&format!("/invoice/{id}/pdf"), Payload::Empty)
            .and_then(|response| decode::<PdfDocument>(&response))
            .map(|doc| doc.base64);
        not_found_as(found, || None)
    }

    // ── Catalog ──────────────────────────────────────────────────────────

    /// Products matching the filter, or all products when neither `field`
    /// nor `value` is given.
    ///
    /// Sent to `/invoice/`, which is where the remote API has been observed
    /// to answer product queries.
    pub fn product_search(
        &self,
        field: Option<&str>,
        value: Option<&str>,
    ) -> Result<Vec<Record>, GatewayError> {
        let response = self.get("/invoice/", optional_filter(field, value))?;
        Ok(decode::<ProductList>(&response)?.products)
    }

    /// Countries matching the filter; with no filter at all this is
    /// [`countries_all`](Self::countries_all).
    pub fn country_search(
        &self,
        field: Option<&str>,
        value: Option<&str>,
    ) -> Result<Vec<Record>, GatewayError> {
        if field.is_none() && value.is_none() {
            return self.countries_all();
        }
        let response = self.get("/country/", optional_filter(field, value))?;
        Ok(decode::<CountryList>(&response)?.countries)
    }

    pub fn countries_all(&self) -> Result<Vec<Record>, GatewayError> {
        let response = self.get("/countries/", Payload::Empty)?;
        Ok(decode::<CountryList>(&response)?.countries)
    }

    pub fn fiscal_position_search(
        &self,
        field: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Vec<Record>, GatewayError> {
        let found = self
            .get(
                "/posiciones_fiscales/",
                Payload::filter(field.as_ref(), value.as_ref()),
            )
            .and_then(|response| decode::<FiscalPositionList>(&response))
            .map(|list| list.fiscal_positions);
        not_found_as(found, Vec::new)
    }

    pub fn currencies_all(&self) -> Result<Vec<Record>, GatewayError> {
        let response = self.get("/monedas/", Payload::Empty)?;
        Ok(decode::<CurrencyList>(&response)?.monedas)
    }
}

fn to_json<S: Serialize + ?Sized>(payload: &S) -> Result<Value, GatewayError> {
    serde_json::to_value(payload).map_err(GatewayError::Serialization)
}

/// Only the parts that were given end up in the query string.
fn optional_filter(field: Option<&str>, value: Option<&str>) -> Payload {
    let pairs = [("key", field), ("q", value)]
        .into_iter()
        .filter_map(|(name, part)| part.map(|part| (name.to_string(), part.to_string())))
        .collect();
    Payload::Query(pairs)
}
