//! `public_ips` data source: every public IP matching the filters

use crate::resources::unique_id;
use crate::{call, flatten};
use async_trait::async_trait;
use oscflow_api::Client;
use oscflow_api::models::{ReadPublicIpsRequest, decode_filters};
use oscflow_api::operations::ReadPublicIps;
use oscflow_cloud::{AttrType, Attribute, CloudError, DataSource, ResourceData, Result, Schema};
use serde_json::{Map, Value};

pub struct PublicIps;

#[async_trait]
impl DataSource<Client> for PublicIps {
    fn type_name(&self) -> &'static str {
        "public_ips"
    }

    fn schema(&self) -> Schema {
        Schema::data_source(vec![
            Attribute::computed("public_ips", AttrType::List),
            Attribute::computed("request_id", AttrType::String),
        ])
    }

    async fn read(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let filters = match d.filters()? {
            Some(filters) => Some(decode_filters(&filters)?),
            None => None,
        };
        let response = call::read::<ReadPublicIps>(client, ReadPublicIpsRequest { filters }).await?;

        let ips = response.public_ips.unwrap_or_default();
        if ips.is_empty() {
            return Err(CloudError::NoResults);
        }

        let addresses: Vec<Value> = ips
            .into_iter()
            .map(|ip| {
                let mut map = Map::new();
                flatten::insert_opt(&mut map, "link_public_ip_id", ip.link_public_ip_id);
                flatten::insert_opt(&mut map, "public_ip_id", ip.public_ip_id);
                flatten::insert_opt(&mut map, "vm_id", ip.vm_id);
                flatten::insert_opt(&mut map, "nic_id", ip.nic_id);
                flatten::insert_opt(&mut map, "nic_account_id", ip.nic_account_id);
                flatten::insert_opt(&mut map, "private_ip", ip.private_ip);
                flatten::insert_opt(&mut map, "public_ip", ip.public_ip);
                map.insert("tags".to_string(), flatten::tags(ip.tags.as_deref()));
                Value::Object(map)
            })
            .collect();

        d.set_id(unique_id());
        d.set("public_ips", addresses);
        flatten::set_request_id(d, response.response_context.as_ref());
        Ok(())
    }
}
