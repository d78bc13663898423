use super::{ResourceTag, ResponseContext};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InternetService {
    pub internet_service_id: Option<String>,
    pub net_id: Option<String>,
    pub state: Option<String>,
    pub tags: Option<Vec<ResourceTag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LinkInternetServiceRequest {
    pub internet_service_id: String,
    pub net_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnlinkInternetServiceRequest {
    pub internet_service_id: String,
    pub net_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default, deny_unknown_fields)]
pub struct FiltersInternetService {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internet_service_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_net_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_states: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_keys: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReadInternetServicesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FiltersInternetService>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ReadInternetServicesResponse {
    pub internet_services: Option<Vec<InternetService>>,
    pub response_context: Option<ResponseContext>,
}
