//! Resilient client for the remote ticketing platform's table API.
//!
//! Everything the gateway sends outward goes through [`TableClient`], which
//! routes all four record operations through one retry wrapper with
//! exponential backoff and jitter. The HTTP layer itself is behind the
//! [`Transport`] trait so tests can script response sequences.

pub mod client;
pub mod query;
pub mod transport;

pub use client::TableClient;
pub use query::RecordQuery;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
