//! `public_ip` resource

use crate::{call, flatten, tags};
use async_trait::async_trait;
use oscflow_api::models::{
    CreatePublicIpRequest, DeletePublicIpRequest, FiltersPublicIp, ReadPublicIpsRequest,
};
use oscflow_api::operations::{CreatePublicIp, DeletePublicIp, ReadPublicIps};
use oscflow_api::{Client, Operation};
use oscflow_cloud::{AttrType, Attribute, CloudError, Resource, ResourceData, Result, Schema};
use tracing::{debug, info};

pub struct PublicIp;

#[async_trait]
impl Resource<Client> for PublicIp {
    fn type_name(&self) -> &'static str {
        "public_ip"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            Attribute::optional("tags", AttrType::List),
            Attribute::computed("public_ip_id", AttrType::String),
            Attribute::computed("public_ip", AttrType::String),
            Attribute::computed("link_public_ip_id", AttrType::String),
            Attribute::computed("vm_id", AttrType::String),
            Attribute::computed("nic_id", AttrType::String),
            Attribute::computed("nic_account_id", AttrType::String),
            Attribute::computed("private_ip", AttrType::String),
            Attribute::computed("request_id", AttrType::String),
        ])
    }

    async fn create(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let response = call::mutate::<CreatePublicIp>(client, CreatePublicIpRequest {}).await?;
        let id = response
            .public_ip
            .and_then(|ip| ip.public_ip_id)
            .ok_or_else(|| CloudError::api(CreatePublicIp::NAME, "response carries no public ip id"))?;
        d.set_id(&id);
        info!("Allocated public IP {}", id);

        if d.is_new_resource() {
            tags::sync(client, d).await?;
        }

        self.read(d, client).await
    }

    async fn read(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let request = ReadPublicIpsRequest {
            filters: Some(FiltersPublicIp {
                public_ip_ids: Some(vec![d.id().to_string()]),
                ..Default::default()
            }),
        };

        let response = match call::read::<ReadPublicIps>(client, request).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                debug!("Public IP {} not found: {}", d.id(), e);
                d.clear_id();
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let Some(ip) = response.public_ips.as_deref().and_then(|ips| ips.first()) else {
            d.clear_id();
            return Ok(());
        };

        d.set_opt("public_ip_id", ip.public_ip_id.clone());
        d.set_opt("public_ip", ip.public_ip.clone());
        d.set_opt("link_public_ip_id", ip.link_public_ip_id.clone());
        d.set_opt("vm_id", ip.vm_id.clone());
        d.set_opt("nic_id", ip.nic_id.clone());
        d.set_opt("nic_account_id", ip.nic_account_id.clone());
        d.set_opt("private_ip", ip.private_ip.clone());
        d.set("tags", flatten::tags(ip.tags.as_deref()));
        flatten::set_request_id(d, response.response_context.as_ref());
        Ok(())
    }

    async fn update(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        tags::sync(client, d).await?;
        self.read(d, client).await
    }

    async fn delete(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let request = DeletePublicIpRequest {
            public_ip_id: Some(d.id().to_string()),
            public_ip: None,
        };

        match call::mutate::<DeletePublicIp>(client, request).await {
            Ok(_) => info!("Released public IP {}", d.id()),
            Err(e) if e.is_not_found() => debug!("Public IP {} already released", d.id()),
            Err(e) => return Err(e),
        }

        d.clear_id();
        Ok(())
    }
}
