//! `internet_service_link` resource
//!
//! Links an internet service to a net. The link has no id of its own: the
//! resource id is the internet service id.

use crate::{call, flatten};
use async_trait::async_trait;
use oscflow_api::Client;
use oscflow_api::models::{
    FiltersInternetService, LinkInternetServiceRequest, ReadInternetServicesRequest,
    ReadInternetServicesResponse, UnlinkInternetServiceRequest,
};
use oscflow_api::operations::{LinkInternetService, ReadInternetServices, UnlinkInternetService};
use oscflow_cloud::{
    AttrType, Attribute, ErrorKind, Refresh, Resource, ResourceData, Result, RetryConfig,
    RetryOn, Schema, StateChangeConf,
};
use std::time::Duration;
use tracing::{debug, info, warn};

const TIMEOUT: Duration = Duration::from_secs(10 * 60);
const MIN_INTERVAL: Duration = Duration::from_secs(30);
const FAIL_STATE: &str = "failed";

pub struct InternetServiceLink;

/// Observed link state.
///
/// An empty listing reads as `deleted`; a listed service with no state tag
/// reads as `available`.
async fn refresh(client: &Client, id: &str) -> Result<Refresh<ReadInternetServicesResponse>> {
    let request = ReadInternetServicesRequest {
        filters: Some(FiltersInternetService {
            internet_service_ids: Some(vec![id.to_string()]),
            ..Default::default()
        }),
    };
    let response = client.call::<ReadInternetServices>(request).await?;

    let state = match response.internet_services.as_deref().and_then(|s| s.first()) {
        None => "deleted".to_string(),
        Some(service) => match service.state.as_deref() {
            None | Some("") => "available".to_string(),
            Some(state) => state.to_string(),
        },
    };
    Ok(Refresh::observed(state, response))
}

fn conf(target: &[&str]) -> StateChangeConf {
    StateChangeConf::new(&["pending"], target, TIMEOUT)
        .fail_state(FAIL_STATE)
        .min_interval(MIN_INTERVAL)
}

#[async_trait]
impl Resource<Client> for InternetServiceLink {
    fn type_name(&self) -> &'static str {
        "internet_service_link"
    }

    fn schema(&self) -> Schema {
        Schema::new(vec![
            Attribute::required("net_id", AttrType::String).force_new(),
            Attribute::required("internet_service_id", AttrType::String).force_new(),
            Attribute::computed("state", AttrType::String),
            Attribute::computed("tags", AttrType::List),
            Attribute::computed("request_id", AttrType::String),
        ])
    }

    async fn create(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let internet_service_id = d.require_str("internet_service_id")?.to_string();
        let request = LinkInternetServiceRequest {
            internet_service_id: internet_service_id.clone(),
            net_id: d.require_str("net_id")?.to_string(),
        };

        call::mutate::<LinkInternetService>(client, request).await?;

        conf(&["available"])
            .wait_for_state(&internet_service_id, || refresh(client, &internet_service_id))
            .await?;

        d.set_id(&internet_service_id);
        info!("Linked internet service {}", internet_service_id);

        self.read(d, client).await
    }

    async fn read(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let id = d.id().to_string();
        let response = conf(&["available", "deleted"])
            .wait_for_state(&id, || refresh(client, &id))
            .await?;

        let Some(service) = response.internet_services.as_deref().and_then(|s| s.first()) else {
            warn!("Internet service {} not found, removing from state", id);
            d.clear_id();
            return Ok(());
        };

        d.set_opt("internet_service_id", service.internet_service_id.clone());
        d.set_opt("net_id", service.net_id.clone());
        d.set_opt("state", service.state.clone());
        d.set("tags", flatten::tags(service.tags.as_deref()));
        flatten::set_request_id(d, response.response_context.as_ref());
        if let Some(id) = &service.internet_service_id {
            d.set_id(id);
        }
        Ok(())
    }

    async fn delete(&self, d: &mut ResourceData, client: &Client) -> Result<()> {
        let id = d.id().to_string();
        let response = conf(&["available", "deleted"])
            .wait_for_state(&id, || refresh(client, &id))
            .await?;

        // Already gone: nothing to unlink
        let Some(service) = response.internet_services.as_deref().and_then(|s| s.first()) else {
            debug!("Internet service {} already deleted", id);
            d.clear_id();
            return Ok(());
        };

        let request = UnlinkInternetServiceRequest {
            internet_service_id: service.internet_service_id.clone().unwrap_or_else(|| id.clone()),
            net_id: service.net_id.clone().unwrap_or_default(),
        };
        let retry_on = RetryOn::kinds(&[ErrorKind::Throttled, ErrorKind::Conflict]);

        match call::execute_with::<UnlinkInternetService>(
            client,
            &RetryConfig::mutation(),
            &retry_on,
            request,
        )
        .await
        {
            Ok(_) => info!("Unlinked internet service {}", id),
            Err(e) if e.is_not_found() => debug!("Internet service {} already unlinked", id),
            Err(e) => return Err(e),
        }

        d.clear_id();
        Ok(())
    }
}
