//! Outscale API client for oscflow
//!
//! A single generic executor replaces one hand-written function per API
//! call: every call is an [`Operation`] naming the endpoint, the HTTP method
//! and its input/output types.
//!
//! # Example
//!
//! ```ignore
//! use oscflow_api::{Client, Credentials, models::ReadNatServicesRequest, operations::ReadNatServices};
//!
//! let client = Client::http(
//!     "https://api.eu-west-2.outscale.com",
//!     Credentials { access_key, secret_key },
//! )?;
//!
//! // No input: the zero-value request lists everything
//! let all = client.execute::<ReadNatServices>(None).await?;
//! ```
//!
//! Error responses are decoded into [`oscflow_cloud::CloudError::Api`] and
//! classified once, here, so callers only ever match on
//! [`oscflow_cloud::ErrorKind`].

pub mod client;
pub mod models;
pub mod operations;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{ApiRequest, ApiResponse, Client, Credentials, HttpTransport, Transport, decode_error};
pub use operations::Operation;
