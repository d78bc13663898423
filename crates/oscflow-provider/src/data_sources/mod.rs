//! Read-only data sources

mod load_balancer_vms;
mod nat_service;
mod net_access_point;
mod public_ips;
mod vm_state;

pub use load_balancer_vms::LoadBalancerVms;
pub use nat_service::NatService;
pub use net_access_point::NetAccessPoint;
pub use public_ips::PublicIps;
pub use vm_state::VmState;

use oscflow_api::Client;
use oscflow_api::models::decode_filters;
use oscflow_cloud::{CloudError, DataSource, FILTER_ATTRIBUTE, Filter, ResourceData, Result};
use serde::de::DeserializeOwned;

/// Every data source type, in registration order
pub fn all() -> Vec<Box<dyn DataSource<Client>>> {
    vec![
        Box::new(NatService),
        Box::new(NetAccessPoint),
        Box::new(PublicIps),
        Box::new(VmState),
        Box::new(LoadBalancerVms),
    ]
}

/// API filter for an exactly-one lookup.
///
/// Needs the id argument `id_attr`, a filter block, or both; the id is
/// sent as the `id_filter` filter.
pub(crate) fn lookup_filters<F: DeserializeOwned>(
    d: &ResourceData,
    id_attr: &str,
    id_filter: &str,
) -> Result<F> {
    let mut filters = d.filters()?.unwrap_or_default();

    match d.get_str(id_attr) {
        Some(id) => filters.push(Filter::new(id_filter, &[id])),
        None if filters.is_empty() => {
            return Err(CloudError::MissingArgument(format!(
                "one of {} or {}",
                id_attr, FILTER_ATTRIBUTE
            )));
        }
        None => {}
    }

    decode_filters(&filters)
}
