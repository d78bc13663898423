//! oscflow cloud primitives
//!
//! This crate holds the provider-independent machinery shared by every
//! resource and data source:
//!
//! - **waiter**: polls a resource until it converges on a target state
//! - **retry**: outer-level retries on transient API errors
//! - **error**: error taxonomy and vendor error classification
//! - **resource** / **schema**: the state handle and attribute declarations
//! - **provider**: the `Resource` and `DataSource` traits
//! - **state**: the local state file used by the CLI
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   oscflow CLI                    │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                oscflow-provider                  │
//! │   security_group, internet_service_link, ...     │
//! └───────┬─────────────────────────┬───────────────┘
//!         │                         │
//! ┌───────▼───────┐         ┌───────▼───────┐
//! │ oscflow-cloud │         │  oscflow-api  │
//! │ waiter, retry │         │ Client, models│
//! └───────────────┘         └───────────────┘
//! ```

pub mod error;
pub mod provider;
pub mod resource;
pub mod retry;
pub mod schema;
pub mod state;
pub mod waiter;

// Re-exports
pub use error::{CloudError, ErrorKind, Result, classify};
pub use provider::{DataSource, Resource, single};
pub use resource::{FILTER_ATTRIBUTE, Filter, ResourceData};
pub use retry::{RetryConfig, RetryError, RetryOn, retry, retry_transient};
pub use schema::{AttrMode, AttrType, Attribute, Schema};
pub use state::{GlobalState, LockedState, ResourceRecord, StateManager, resource_key};
pub use waiter::{Refresh, StateChangeConf};
