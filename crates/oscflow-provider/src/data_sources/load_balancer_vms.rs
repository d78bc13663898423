//! `load_balancer_vms` data source: backend VMs of one load balancer

use super::lookup_filters;
use crate::{call, flatten};
use async_trait::async_trait;
use oscflow_api::Client;
use oscflow_api::models::ReadLoadBalancersRequest;
use oscflow_api::operations::ReadLoadBalancers;
use oscflow_cloud::{AttrType, Attribute, DataSource, ResourceData, Result, Schema, single};

pub struct LoadBalancerVms;

#[async_trait]
impl DataSource<Client> for LoadBalancerVms {
    fn type_name(&self) -> &'static str {
        "load_balancer_vms"
    }

    fn schema(&self) -> Schema {
        Schema::data_source(vec![
            Attribute::optional_computed("load_balancer_name", AttrType::String),
            Attribute::computed("backend_vm_ids", AttrType::List),
            Attribute::computed("request_id", AttrType::String),
        ])
    }

    async fn read(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let request = ReadLoadBalancersRequest {
            filters: Some(lookup_filters(d, "load_balancer_name", "load_balancer_names")?),
        };
        let response = call::read::<ReadLoadBalancers>(client, request).await?;
        let lb = single(response.load_balancers.unwrap_or_default())?;

        if let Some(name) = &lb.load_balancer_name {
            d.set_id(name);
        }
        d.set("backend_vm_ids", flatten::string_list(lb.backend_vm_ids.as_deref()));
        d.set_opt("load_balancer_name", lb.load_balancer_name);
        flatten::set_request_id(d, response.response_context.as_ref());
        Ok(())
    }
}
