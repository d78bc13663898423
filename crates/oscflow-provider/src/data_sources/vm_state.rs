//! `vm_state` data source

use super::lookup_filters;
use crate::{call, flatten};
use async_trait::async_trait;
use oscflow_api::Client;
use oscflow_api::models::ReadVmsStateRequest;
use oscflow_api::operations::ReadVmsState;
use oscflow_cloud::{AttrType, Attribute, DataSource, ResourceData, Result, Schema, single};
use serde_json::{Map, Value};
use tracing::debug;

pub struct VmState;

#[async_trait]
impl DataSource<Client> for VmState {
    fn type_name(&self) -> &'static str {
        "vm_state"
    }

    fn schema(&self) -> Schema {
        Schema::data_source(vec![
            Attribute::optional_computed("vm_id", AttrType::String),
            Attribute::optional("all_vms", AttrType::Bool).default_value(false),
            Attribute::computed("vm_state", AttrType::String),
            Attribute::computed("subregion_name", AttrType::String),
            Attribute::computed("maintenance_events", AttrType::List),
            Attribute::computed("request_id", AttrType::String),
        ])
    }

    async fn read(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let request = ReadVmsStateRequest {
            all_vms: d.get_bool("all_vms"),
            filters: Some(lookup_filters(d, "vm_id", "vm_ids")?),
        };
        let response = call::read::<ReadVmsState>(client, request).await?;
        let state = single(response.vm_states.unwrap_or_default())?;
        debug!("Single VM state found: {:?}", state.vm_id);

        let events: Vec<Value> = state
            .maintenance_events
            .unwrap_or_default()
            .into_iter()
            .map(|e| {
                let mut map = Map::new();
                flatten::insert_opt(&mut map, "code", e.code);
                flatten::insert_opt(&mut map, "description", e.description);
                flatten::insert_opt(&mut map, "not_before", e.not_before);
                flatten::insert_opt(&mut map, "not_after", e.not_after);
                Value::Object(map)
            })
            .collect();

        if let Some(id) = &state.vm_id {
            d.set_id(id);
        }
        d.set_opt("vm_id", state.vm_id);
        d.set_opt("vm_state", state.vm_state);
        d.set_opt("subregion_name", state.subregion_name);
        d.set("maintenance_events", events);
        flatten::set_request_id(d, response.response_context.as_ref());
        Ok(())
    }
}
