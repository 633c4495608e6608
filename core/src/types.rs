//! Resource payloads and the searchable fields of each resource.
//!
//! # Design
//! The remote API defines its records, so the client keeps them as loose
//! JSON maps. Typed views exist only where the shape is stable across
//! endpoints (`InvoiceSummary`).

use serde::{Deserialize, Serialize};

/// One resource record as returned by the API (client, invoice, product,
/// country, fiscal position or currency).
pub type Record = serde_json::Map<String, serde_json::Value>;

/// The stable part of an invoice record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub id: i64,
    pub number: String,
}

impl InvoiceSummary {
    /// Read `id` and `number` out of an invoice record, ignoring other fields.
    pub fn from_record(record: &Record) -> Result<Self, serde_json::Error> {
        let id = record.get("id").cloned().unwrap_or_default();
        let number = record.get("number").cloned().unwrap_or_default();
        serde_json::from_value(serde_json::json!({ "id": id, "number": number }))
    }
}

macro_rules! search_fields {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }
    };
}

search_fields! {
    /// Fields accepted by the client search endpoint.
    ClientField {
        City => "city",
        Vat => "vat",
        Name => "name",
        Phone => "phone",
        Mobile => "mobile",
        Fax => "fax",
        Id => "id",
    }
}

search_fields! {
    /// Fields accepted by the invoice search endpoint.
    InvoiceField {
        Number => "number",
        DateInvoice => "date_invoice",
        InvoiceNumber => "invoice_number",
        Name => "name",
        Origin => "origin",
        Id => "id",
    }
}

search_fields! {
    /// Fields accepted by the product search endpoint.
    ProductField {
        Id => "id",
        Name => "name",
        ListPrice => "list_price",
        Description => "description",
    }
}

search_fields! {
    /// Fields accepted by the country search endpoint.
    CountryField {
        Id => "id",
        Name => "name",
        Code => "code",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> Record {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn invoice_summary_reads_id_and_number() {
        let invoice = record(json!({"id": 42, "number": "INV-0001", "lines": []}));
        let summary = InvoiceSummary::from_record(&invoice).unwrap();
        assert_eq!(
            summary,
            InvoiceSummary {
                id: 42,
                number: "INV-0001".to_string()
            }
        );
    }

    #[test]
    fn invoice_summary_rejects_missing_number() {
        let invoice = record(json!({"id": 42}));
        assert!(InvoiceSummary::from_record(&invoice).is_err());
    }

    #[test]
    fn field_enums_render_wire_names() {
        assert_eq!(ClientField::Vat.as_str(), "vat");
        assert_eq!(InvoiceField::DateInvoice.as_ref(), "date_invoice");
        assert_eq!(ProductField::ListPrice.as_str(), "list_price");
        assert_eq!(CountryField::Code.as_str(), "code");
    }
}
