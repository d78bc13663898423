//! `security_group` resource

use crate::flatten::{self, insert_opt};
use crate::{call, tags};
use async_trait::async_trait;
use oscflow_api::Client;
use oscflow_api::models::{
    CreateSecurityGroupRequest, DeleteSecurityGroupRequest, FiltersSecurityGroup,
    ReadSecurityGroupsRequest, SecurityGroup as Group, SecurityGroupRule,
};
use oscflow_api::operations::{CreateSecurityGroup, DeleteSecurityGroup, ReadSecurityGroups};
use oscflow_api::Operation;
use oscflow_cloud::schema::max_len_255;
use oscflow_cloud::{
    AttrType, Attribute, CloudError, ErrorKind, Refresh, Resource, ResourceData, Result,
    RetryConfig, RetryOn, Schema, StateChangeConf,
};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_DESCRIPTION: &str = "Managed by oscflow";
const CREATE_TIMEOUT: Duration = Duration::from_secs(3 * 60);

pub struct SecurityGroup;

/// Look up one security group by id; `None` when the API lists nothing.
async fn find(client: &Client, id: &str) -> Result<Option<Group>> {
    let response = client.call::<ReadSecurityGroups>(by_id(id)).await?;
    Ok(response.security_groups.unwrap_or_default().into_iter().next())
}

fn by_id(id: &str) -> ReadSecurityGroupsRequest {
    ReadSecurityGroupsRequest {
        filters: Some(FiltersSecurityGroup {
            security_group_ids: Some(vec![id.to_string()]),
            ..Default::default()
        }),
    }
}

fn flatten_rules(rules: Option<&[SecurityGroupRule]>) -> Value {
    Value::Array(
        rules
            .unwrap_or_default()
            .iter()
            .map(|rule| {
                let mut map = Map::new();
                insert_opt(&mut map, "from_port_range", rule.from_port_range);
                insert_opt(&mut map, "to_port_range", rule.to_port_range);
                insert_opt(&mut map, "ip_protocol", rule.ip_protocol.clone());
                map.insert(
                    "ip_ranges".to_string(),
                    flatten::string_list(rule.ip_ranges.as_deref()),
                );
                let members = rule
                    .security_groups_members
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .map(|m| {
                        let mut member = Map::new();
                        insert_opt(&mut member, "account_id", m.account_id.clone());
                        insert_opt(&mut member, "security_group_id", m.security_group_id.clone());
                        insert_opt(&mut member, "security_group_name", m.security_group_name.clone());
                        Value::Object(member)
                    })
                    .collect();
                map.insert("security_groups_members".to_string(), Value::Array(members));
                Value::Object(map)
            })
            .collect(),
    )
}

#[async_trait]
impl Resource<Client> for SecurityGroup {
    fn type_name(&self) -> &'static str {
        "security_group"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            Attribute::optional("description", AttrType::String)
                .force_new()
                .default_value(DEFAULT_DESCRIPTION)
                .validate_with(max_len_255),
            Attribute::optional_computed("security_group_name", AttrType::String).force_new(),
            Attribute::optional_computed("net_id", AttrType::String).force_new(),
            Attribute::optional("tags", AttrType::List),
            Attribute::computed("security_group_id", AttrType::String),
            Attribute::computed("account_id", AttrType::String),
            Attribute::computed("inbound_rules", AttrType::List),
            Attribute::computed("outbound_rules", AttrType::List),
            Attribute::computed("request_id", AttrType::String),
        ])
    }

    async fn create(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let request = CreateSecurityGroupRequest {
            description: d
                .get_string("description")
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            net_id: d.get_string("net_id"),
            security_group_name: d
                .get_string("security_group_name")
                .unwrap_or_else(super::unique_id),
        };
        debug!("Security group create configuration: {:?}", request);

        let response = call::mutate::<CreateSecurityGroup>(client, request).await?;
        let id = response
            .security_group
            .and_then(|g| g.security_group_id)
            .ok_or_else(|| {
                CloudError::api(CreateSecurityGroup::NAME, "response carries no security group id")
            })?;
        d.set_id(&id);
        info!("Created security group {}", id);

        // The group can take a moment to show up in listings
        StateChangeConf::new(&[""], &["exists"], CREATE_TIMEOUT)
            .wait_for_state(&id, || async {
                Ok(match find(client, &id).await? {
                    Some(g) => Refresh::observed("exists", g),
                    None => Refresh::NotFound,
                })
            })
            .await?;

        if d.is_new_resource() {
            tags::sync(client, d).await?;
        }

        self.read(d, client).await
    }

    async fn read(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let response = call::read::<ReadSecurityGroups>(client, by_id(d.id())).await?;

        let Some(group) = response.security_groups.as_deref().and_then(|g| g.first()) else {
            debug!("Security group {} no longer exists", d.id());
            d.clear_id();
            return Ok(());
        };

        d.set_opt("security_group_id", group.security_group_id.clone());
        d.set_opt("description", group.description.clone());
        d.set_opt(
            "security_group_name",
            group.security_group_name.clone().filter(|n| !n.is_empty()),
        );
        d.set_opt("net_id", group.net_id.clone());
        d.set_opt("account_id", group.account_id.clone());
        d.set("tags", flatten::tags(group.tags.as_deref()));
        d.set("inbound_rules", flatten_rules(group.inbound_rules.as_deref()));
        d.set("outbound_rules", flatten_rules(group.outbound_rules.as_deref()));
        flatten::set_request_id(d, response.response_context.as_ref());

        if let Some(id) = &group.security_group_id {
            d.set_id(id);
        }
        Ok(())
    }

    async fn update(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        tags::sync(client, d).await?;
        self.read(d, client).await
    }

    async fn delete(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        debug!("Security group destroy: {}", d.id());

        let retry_on = RetryOn::kinds(&[
            ErrorKind::Throttled,
            ErrorKind::DependencyViolation,
            ErrorKind::Conflict,
        ]);
        let request = DeleteSecurityGroupRequest {
            security_group_id: Some(d.id().to_string()),
            security_group_name: None,
        };

        match call::execute_with::<DeleteSecurityGroup>(
            client,
            &RetryConfig::mutation(),
            &retry_on,
            request,
        )
        .await
        {
            Ok(_) => info!("Deleted security group {}", d.id()),
            Err(e) if e.is_not_found() => debug!("Security group {} already gone", d.id()),
            Err(e) => return Err(e),
        }

        d.clear_id();
        Ok(())
    }
}
