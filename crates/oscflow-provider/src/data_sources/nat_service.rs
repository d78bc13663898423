//! `nat_service` data source

use super::lookup_filters;
use crate::{call, flatten};
use async_trait::async_trait;
use oscflow_api::Client;
use oscflow_api::models::ReadNatServicesRequest;
use oscflow_api::operations::ReadNatServices;
use oscflow_cloud::{AttrType, Attribute, DataSource, ResourceData, Result, Schema, single};
use serde_json::{Map, Value};

pub struct NatService;

#[async_trait]
impl DataSource<Client> for NatService {
    fn type_name(&self) -> &'static str {
        "nat_service"
    }

    fn schema(&self) -> Schema {
        Schema::data_source(vec![
            Attribute::optional_computed("nat_service_id", AttrType::String),
            Attribute::computed("net_id", AttrType::String),
            Attribute::computed("subnet_id", AttrType::String),
            Attribute::computed("state", AttrType::String),
            Attribute::computed("public_ips", AttrType::List),
            Attribute::computed("tags", AttrType::List),
            Attribute::computed("request_id", AttrType::String),
        ])
    }

    async fn read(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let request = ReadNatServicesRequest {
            filters: Some(lookup_filters(d, "nat_service_id", "nat_service_ids")?),
        };
        let response = call::read::<ReadNatServices>(client, request).await?;
        let nat = single(response.nat_services.unwrap_or_default())?;

        let public_ips: Vec<Value> = nat
            .public_ips
            .unwrap_or_default()
            .into_iter()
            .map(|ip| {
                let mut map = Map::new();
                flatten::insert_opt(&mut map, "public_ip", ip.public_ip);
                flatten::insert_opt(&mut map, "public_ip_id", ip.public_ip_id);
                Value::Object(map)
            })
            .collect();

        if let Some(id) = &nat.nat_service_id {
            d.set_id(id);
        }
        d.set_opt("nat_service_id", nat.nat_service_id);
        d.set_opt("net_id", nat.net_id);
        d.set_opt("subnet_id", nat.subnet_id);
        d.set_opt("state", nat.state);
        d.set("public_ips", public_ips);
        d.set("tags", flatten::tags(nat.tags.as_deref()));
        flatten::set_request_id(d, response.response_context.as_ref());
        Ok(())
    }
}
