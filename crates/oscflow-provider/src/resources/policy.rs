//! `policy` resource
//!
//! The id is the policy ORN.

use crate::{call, flatten};
use async_trait::async_trait;
use oscflow_api::models::{
    CreatePolicyRequest, DeletePolicyRequest, DeletePolicyVersionRequest, ReadPolicyRequest,
    ReadPolicyVersionsRequest,
};
use oscflow_api::operations::{
    CreatePolicy, DeletePolicy, DeletePolicyVersion, ReadPolicy, ReadPolicyVersions,
};
use oscflow_api::{Client, Operation};
use oscflow_cloud::{AttrType, Attribute, CloudError, Resource, ResourceData, Result, Schema};
use tracing::{debug, info};

pub struct Policy;

#[async_trait]
impl Resource<Client> for Policy {
    fn type_name(&self) -> &'static str {
        "policy"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            Attribute::required("policy_name", AttrType::String).force_new(),
            Attribute::required("document", AttrType::String).force_new(),
            Attribute::optional("description", AttrType::String).force_new(),
            Attribute::optional_computed("path", AttrType::String).force_new(),
            Attribute::computed("orn", AttrType::String),
            Attribute::computed("policy_id", AttrType::String),
            Attribute::computed("policy_default_version_id", AttrType::String),
            Attribute::computed("resources_count", AttrType::Int),
            Attribute::computed("is_linkable", AttrType::Bool),
            Attribute::computed("creation_date", AttrType::String),
            Attribute::computed("last_modification_date", AttrType::String),
            Attribute::computed("request_id", AttrType::String),
        ])
    }

    async fn create(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let request = CreatePolicyRequest {
            policy_name: d.require_str("policy_name")?.to_string(),
            document: d.require_str("document")?.to_string(),
            description: d.get_string("description"),
            path: d.get_string("path"),
        };

        let response = call::mutate::<CreatePolicy>(client, request).await?;
        let orn = response
            .policy
            .and_then(|p| p.orn)
            .ok_or_else(|| CloudError::api(CreatePolicy::NAME, "response carries no policy ORN"))?;
        d.set_id(&orn);
        info!("Created policy {}", orn);

        self.read(d, client).await
    }

    async fn read(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let request = ReadPolicyRequest {
            policy_orn: d.id().to_string(),
        };

        let response = match call::read::<ReadPolicy>(client, request).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                debug!("Policy {} not found", d.id());
                d.clear_id();
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let Some(policy) = response.policy else {
            d.clear_id();
            return Ok(());
        };

        d.set_opt("policy_name", policy.policy_name);
        d.set_opt("description", policy.description);
        d.set_opt("path", policy.path);
        d.set_opt("orn", policy.orn);
        d.set_opt("policy_id", policy.policy_id);
        d.set_opt("policy_default_version_id", policy.policy_default_version_id);
        d.set_opt("resources_count", policy.resources_count);
        d.set_opt("is_linkable", policy.is_linkable);
        d.set_opt("creation_date", policy.creation_date);
        d.set_opt("last_modification_date", policy.last_modification_date);
        flatten::set_request_id(d, response.response_context.as_ref());
        Ok(())
    }

    async fn delete(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let orn = d.id().to_string();

        // A policy with non-default versions cannot be deleted
        let listed = call::list::<ReadPolicyVersions>(
            client,
            ReadPolicyVersionsRequest {
                policy_orn: orn.clone(),
            },
        )
        .await;
        let versions = match listed {
            Ok(response) => response.policy_versions.unwrap_or_default(),
            Err(e) if e.is_not_found() => {
                debug!("Policy {} already deleted", orn);
                d.clear_id();
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        for version in versions {
            if version.default_version == Some(true) {
                continue;
            }
            let Some(version_id) = version.version_id else {
                continue;
            };
            debug!("Deleting version {} of policy {}", version_id, orn);
            let deleted = call::mutate::<DeletePolicyVersion>(
                client,
                DeletePolicyVersionRequest {
                    policy_orn: orn.clone(),
                    version_id,
                },
            )
            .await;
            match deleted {
                Ok(_) => {}
                Err(e) if e.is_not_found() => debug!("Policy version already deleted: {}", e),
                Err(e) => return Err(e),
            }
        }

        match call::mutate::<DeletePolicy>(client, DeletePolicyRequest { policy_orn: orn.clone() }).await {
            Ok(_) => info!("Deleted policy {}", orn),
            Err(e) if e.is_not_found() => debug!("Policy {} already deleted", orn),
            Err(e) => return Err(e),
        }

        d.clear_id();
        Ok(())
    }
}
