//! `tag` resource
//!
//! A set of tags attached to one resource. The id is the tagged resource's id.

use crate::tags::{self, TAGS_ATTRIBUTE};
use crate::{call, flatten};
use async_trait::async_trait;
use oscflow_api::Client;
use oscflow_api::models::{CreateTagsRequest, DeleteTagsRequest, FiltersTag, ReadTagsRequest};
use oscflow_api::operations::{CreateTags, DeleteTags, ReadTags};
use oscflow_cloud::{AttrType, Attribute, CloudError, Resource, ResourceData, Result, Schema};
use serde_json::{Map, Value};
use tracing::info;

pub struct Tag;

#[async_trait]
impl Resource<Client> for Tag {
    fn type_name(&self) -> &'static str {
        "tag"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            Attribute::required("resource_id", AttrType::String).force_new(),
            Attribute::required(TAGS_ATTRIBUTE, AttrType::List).force_new(),
            Attribute::computed("resource_type", AttrType::String),
            Attribute::computed("request_id", AttrType::String),
        ])
    }

    async fn create(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let resource_id = d.require_str("resource_id")?.to_string();
        let declared = tags::declared(d)?;
        if declared.is_empty() {
            return Err(CloudError::MissingArgument(TAGS_ATTRIBUTE.to_string()));
        }

        let request = CreateTagsRequest {
            resource_ids: vec![resource_id.clone()],
            tags: declared,
        };
        call::mutate::<CreateTags>(client, request).await?;

        d.set_id(&resource_id);
        info!("Tagged {}", resource_id);

        self.read(d, client).await
    }

    async fn read(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let keys: Vec<String> = tags::declared(d)?.into_iter().map(|t| t.key).collect();
        let request = ReadTagsRequest {
            filters: Some(FiltersTag {
                resource_ids: Some(vec![d.id().to_string()]),
                keys: (!keys.is_empty()).then_some(keys),
                ..Default::default()
            }),
        };
        let response = call::list::<ReadTags>(client, request).await?;

        let found = response.tags.unwrap_or_default();
        if found.is_empty() {
            d.clear_id();
            return Ok(());
        }

        d.set_opt("resource_type", found[0].resource_type.clone());
        let blocks = found
            .iter()
            .map(|t| {
                let mut map = Map::new();
                map.insert("key".to_string(), Value::from(t.key.clone().unwrap_or_default()));
                map.insert("value".to_string(), Value::from(t.value.clone().unwrap_or_default()));
                Value::Object(map)
            })
            .collect::<Vec<_>>();
        d.set(TAGS_ATTRIBUTE, blocks);
        flatten::set_request_id(d, response.response_context.as_ref());
        Ok(())
    }

    async fn delete(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let request = DeleteTagsRequest {
            resource_ids: vec![d.id().to_string()],
            tags: tags::declared(d)?,
        };
        call::mutate::<DeleteTags>(client, request).await?;

        info!("Removed tags from {}", d.id());
        d.clear_id();
        Ok(())
    }
}
