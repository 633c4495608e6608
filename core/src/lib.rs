//! Synchronous client for the Txerpa business-management API.
//!
//! # Overview
//! `ApiGateway` turns calls such as [`ApiGateway::client_search`] or
//! [`ApiGateway::invoice_new`] into authenticated HTTP requests, runs them
//! through an injected [`Transport`], and classifies the response: status 200
//! is decoded and unwrapped, anything else becomes a [`DomainError`] carrying
//! the status.
//!
//! # Design
//! - The gateway holds only credentials and the transport; no mutable state.
//! - Requests and responses are plain data, so the gateway is testable
//!   without a network and any HTTP library can sit behind `Transport`.
//!   [`UreqTransport`] is the stock implementation (feature `ureq`).
//! - "Nothing matched" is a normal outcome: searches return an empty `Vec`
//!   and key lookups return `None` on 404.
//! - Records stay as JSON maps ([`Record`]); the server defines their shape.
//!
//! ```no_run
//! use txerpa_core::{ApiGateway, ClientField, Credentials, UreqTransport};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Credentials::from_dotenv()?;
//! let txerpa = ApiGateway::new(credentials, UreqTransport::new());
//! for client in txerpa.client_search(ClientField::City, "gotham")? {
//!     println!("{}", client["name"]);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod credentials;
pub mod error;
pub mod http;
mod resources;
pub mod types;
mod wire;

#[cfg(feature = "ureq")]
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::{ApiGateway, Payload};
pub use credentials::Credentials;
pub use error::{CredentialsError, DomainError, GatewayError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use types::{ClientField, CountryField, InvoiceField, InvoiceSummary, ProductField, Record};

#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
