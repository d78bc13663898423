//! `net_access_point` data source

use super::lookup_filters;
use crate::{call, flatten};
use async_trait::async_trait;
use oscflow_api::Client;
use oscflow_api::models::ReadNetAccessPointsRequest;
use oscflow_api::operations::ReadNetAccessPoints;
use oscflow_cloud::{AttrType, Attribute, DataSource, ResourceData, Result, Schema, single};

pub struct NetAccessPoint;

#[async_trait]
impl DataSource<Client> for NetAccessPoint {
    fn type_name(&self) -> &'static str {
        "net_access_point"
    }

    fn schema(&self) -> Schema {
        Schema::data_source(vec![
            Attribute::optional_computed("net_access_point_id", AttrType::String),
            Attribute::computed("net_id", AttrType::String),
            Attribute::computed("service_name", AttrType::String),
            Attribute::computed("state", AttrType::String),
            Attribute::computed("route_table_ids", AttrType::List),
            Attribute::computed("tags", AttrType::List),
            Attribute::computed("request_id", AttrType::String),
        ])
    }

    async fn read(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let request = ReadNetAccessPointsRequest {
            filters: Some(lookup_filters(d, "net_access_point_id", "net_access_point_ids")?),
        };
        let response = call::list::<ReadNetAccessPoints>(client, request).await?;
        let nap = single(response.net_access_points.unwrap_or_default())?;

        if let Some(id) = &nap.net_access_point_id {
            d.set_id(id);
        }
        d.set("route_table_ids", flatten::string_list(nap.route_table_ids.as_deref()));
        d.set("tags", flatten::tags(nap.tags.as_deref()));
        d.set_opt("net_access_point_id", nap.net_access_point_id);
        d.set_opt("net_id", nap.net_id);
        d.set_opt("service_name", nap.service_name);
        d.set_opt("state", nap.state);
        flatten::set_request_id(d, response.response_context.as_ref());
        Ok(())
    }
}
