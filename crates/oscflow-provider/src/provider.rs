//! Provider registry

use crate::{data_sources, resources};
use oscflow_api::Client;
use oscflow_cloud::{CloudError, DataSource, Resource, ResourceData, Result};
use std::collections::BTreeMap;
use tracing::info;

/// Outscale provider
///
/// Owns the API client and dispatches CRUD calls by type name after
/// validating the handle against the type's schema.
pub struct OscProvider {
    client: Client,
    resources: BTreeMap<&'static str, Box<dyn Resource<Client>>>,
    data_sources: BTreeMap<&'static str, Box<dyn DataSource<Client>>>,
}

impl OscProvider {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            resources: resources::all()
                .into_iter()
                .map(|r| (r.type_name(), r))
                .collect(),
            data_sources: data_sources::all()
                .into_iter()
                .map(|ds| (ds.type_name(), ds))
                .collect(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn resource_types(&self) -> Vec<&'static str> {
        self.resources.keys().copied().collect()
    }

    pub fn data_source_types(&self) -> Vec<&'static str> {
        self.data_sources.keys().copied().collect()
    }

    pub fn resource(&self, name: &str) -> Result<&dyn Resource<Client>> {
        self.resources
            .get(name)
            .map(|r| r.as_ref())
            .ok_or_else(|| CloudError::UnknownType(name.to_string()))
    }

    pub fn data_source(&self, name: &str) -> Result<&dyn DataSource<Client>> {
        self.data_sources
            .get(name)
            .map(|ds| ds.as_ref())
            .ok_or_else(|| CloudError::UnknownType(name.to_string()))
    }

    /// Create a resource; on success `d` carries the new id.
    pub async fn create(&self, resource_type: &str, d: &mut ResourceData) -> Result<()> {
        let resource = self.resource(resource_type)?;
        resource.schema().prepare(d)?;

        d.mark_new_resource(true);
        let result = resource.create(d, &self.client).await;
        d.mark_new_resource(false);
        result?;

        info!("{} {} created", resource_type, d.id());
        Ok(())
    }

    /// Refresh `d` from the API. An empty id afterwards means the resource
    /// is gone.
    pub async fn read(&self, resource_type: &str, d: &mut ResourceData) -> Result<()> {
        let resource = self.resource(resource_type)?;
        if !d.exists() {
            return Err(CloudError::InvalidConfig(format!(
                "{} has no id to read",
                resource_type
            )));
        }
        resource.read(d, &self.client).await
    }

    /// Apply in-place changes from `old` to `new`.
    ///
    /// Refuses when a force-new attribute changed.
    pub async fn update(&self, resource_type: &str, old: &ResourceData, new: &mut ResourceData) -> Result<()> {
        let resource = self.resource(resource_type)?;
        let schema = resource.schema();
        schema.prepare(new)?;

        // Defaults apply to both sides so an unset value never reads as a change
        let mut before = old.clone();
        schema.prepare(&mut before)?;

        let replaced = schema.replacement_attributes(&before, new);
        if !replaced.is_empty() {
            return Err(CloudError::InvalidConfig(format!(
                "changing {} requires replacing the {}",
                replaced.join(", "),
                resource_type
            )));
        }

        new.set_id(old.id());
        resource.update(new, &self.client).await
    }

    pub async fn delete(&self, resource_type: &str, d: &mut ResourceData) -> Result<()> {
        let resource = self.resource(resource_type)?;
        resource.delete(d, &self.client).await?;
        info!("{} deleted", resource_type);
        Ok(())
    }

    /// Run a data source lookup.
    pub async fn read_data_source(&self, data_source: &str, d: &mut ResourceData) -> Result<()> {
        let ds = self.data_source(data_source)?;
        ds.schema().prepare(d)?;
        ds.read(d, &self.client).await
    }
}
