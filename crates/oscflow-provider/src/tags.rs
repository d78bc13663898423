//! Tag synchronisation shared by taggable resources

use crate::call;
use oscflow_api::Client;
use oscflow_api::models::{CreateTagsRequest, DeleteTagsRequest, FiltersTag, ReadTagsRequest, ResourceTag};
use oscflow_api::operations::{CreateTags, DeleteTags, ReadTags};
use oscflow_cloud::{ResourceData, Result};
use serde::Deserialize;
use tracing::debug;

pub(crate) const TAGS_ATTRIBUTE: &str = "tags";

#[derive(Deserialize)]
struct TagBlock {
    key: String,
    #[serde(default)]
    value: String,
}

/// Tags declared on the handle, in declaration order.
pub(crate) fn declared(d: &ResourceData) -> Result<Vec<ResourceTag>> {
    let blocks: Vec<TagBlock> = d.decode(TAGS_ATTRIBUTE)?.unwrap_or_default();
    Ok(blocks
        .into_iter()
        .map(|b| ResourceTag::new(b.key, b.value))
        .collect())
}

/// Tags currently attached to `resource_id`.
pub(crate) async fn current(client: &Client, resource_id: &str) -> Result<Vec<ResourceTag>> {
    let request = ReadTagsRequest {
        filters: Some(FiltersTag {
            resource_ids: Some(vec![resource_id.to_string()]),
            ..Default::default()
        }),
    };
    let response = call::list::<ReadTags>(client, request).await?;

    Ok(response
        .tags
        .unwrap_or_default()
        .into_iter()
        .filter_map(|t| Some(ResourceTag::new(t.key?, t.value.unwrap_or_default())))
        .collect())
}

/// Split the change from `old` to `new` into (to remove, to create).
///
/// A tag whose value changed is removed and re-created.
pub(crate) fn diff(old: &[ResourceTag], new: &[ResourceTag]) -> (Vec<ResourceTag>, Vec<ResourceTag>) {
    let remove = old.iter().filter(|t| !new.contains(t)).cloned().collect();
    let create = new.iter().filter(|t| !old.contains(t)).cloned().collect();
    (remove, create)
}

/// Make the tags on `resource_id` match the handle's declared tags.
pub(crate) async fn sync(client: &Client, d: &ResourceData) -> Result<()> {
    let desired = declared(d)?;
    let existing = if d.is_new_resource() {
        Vec::new()
    } else {
        current(client, d.id()).await?
    };

    let (remove, create) = diff(&existing, &desired);
    let resource_ids = vec![d.id().to_string()];

    if !remove.is_empty() {
        debug!("Removing {} tags from {}", remove.len(), d.id());
        call::mutate::<DeleteTags>(
            client,
            DeleteTagsRequest {
                resource_ids: resource_ids.clone(),
                tags: remove,
            },
        )
        .await?;
    }

    if !create.is_empty() {
        debug!("Creating {} tags on {}", create.len(), d.id());
        call::mutate::<CreateTags>(
            client,
            CreateTagsRequest {
                resource_ids,
                tags: create,
            },
        )
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_declared_tags() {
        let d = ResourceData::new().with_attribute(
            "tags",
            json!([{ "key": "name", "value": "web" }, { "key": "owner" }]),
        );

        assert_eq!(
            declared(&d).unwrap(),
            vec![ResourceTag::new("name", "web"), ResourceTag::new("owner", "")]
        );
        assert!(declared(&ResourceData::new()).unwrap().is_empty());
    }

    #[test]
    fn test_diff_replaces_changed_values() {
        let old = vec![ResourceTag::new("env", "dev"), ResourceTag::new("team", "a")];
        let new = vec![ResourceTag::new("env", "prod"), ResourceTag::new("team", "a")];

        let (remove, create) = diff(&old, &new);
        assert_eq!(remove, vec![ResourceTag::new("env", "dev")]);
        assert_eq!(create, vec![ResourceTag::new("env", "prod")]);
    }
}
