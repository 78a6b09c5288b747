//! Synchronous client for the KwikDesk platform API.
//!
//! # Overview
//! Five operations (token creation, message posting, channel listing,
//! search, server time) over HTTPS with JSON bodies. `KwikDeskClient`
//! builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network; `BlockingClient` pairs it with a `Transport` for
//! the usual one-call API.
//!
//! ```no_run
//! use kwikdesk_core::BlockingClient;
//!
//! # fn main() -> Result<(), kwikdesk_core::ApiError> {
//! let mut client = BlockingClient::new("");
//! client.create_token("YourAppName")?;
//! client.messages("Searchable content #test", 100000, false)?;
//! let found = client.search("#test")?;
//! println!("{} results", found.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - Success is an explicit status allow-list (200, 201, 202, 204).
//! - Every failure is an `ApiError` carrying the best-effort decoded body.
//! - Fields an operation depends on (`token`, `results`) are checked before
//!   they are handed out; a missing field is `ApiError::UnexpectedShape`.

pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use blocking::BlockingClient;
pub use client::{is_success, KwikDeskClient, SUCCESS_STATUSES};
pub use config::{ClientConfig, Endpoint};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{HttpExecutor, Transport};
pub use types::{Envelope, Message, Results, TokenResult};
