//! Wire models for the Outscale API
//!
//! Field names follow the API's PascalCase JSON. Every field the API may
//! omit is an `Option`, so a missing value never turns into a zero value.

mod common;
mod internet_service;
mod load_balancer;
mod nat_service;
mod net_access_point;
mod policy;
mod public_ip;
mod security_group;
mod tag;
mod vm;

pub use common::*;
pub use internet_service::*;
pub use load_balancer::*;
pub use nat_service::*;
pub use net_access_point::*;
pub use policy::*;
pub use public_ip::*;
pub use security_group::*;
pub use tag::*;
pub use vm::*;
