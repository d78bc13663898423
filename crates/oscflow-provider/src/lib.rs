//! Outscale provider for oscflow
//!
//! Maps resource and data-source handles onto Outscale API calls.
//!
//! # Resources
//!
//! - `security_group`
//! - `internet_service_link`
//! - `public_ip`
//! - `tag`
//! - `policy`
//!
//! # Data sources
//!
//! - `nat_service`, `net_access_point`, `vm_state`, `load_balancer_vms`
//!   (exactly one match)
//! - `public_ips` (listing)
//!
//! # Example
//!
//! ```ignore
//! use oscflow_api::{Client, Credentials};
//! use oscflow_cloud::ResourceData;
//! use oscflow_provider::OscProvider;
//!
//! let provider = OscProvider::new(Client::http(endpoint, credentials)?);
//!
//! let mut sg = ResourceData::new()
//!     .with_attribute("security_group_name", "web")
//!     .with_attribute("net_id", "vpc-12345678");
//! provider.create("security_group", &mut sg).await?;
//! println!("created {}", sg.id());
//! ```

mod call;
pub mod data_sources;
mod flatten;
pub mod provider;
pub mod resources;
mod tags;

pub use provider::OscProvider;
