use super::{ResourceTag, ResponseContext};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NatService {
    pub nat_service_id: Option<String>,
    pub net_id: Option<String>,
    pub public_ips: Option<Vec<PublicIpLight>>,
    pub state: Option<String>,
    pub subnet_id: Option<String>,
    pub tags: Option<Vec<ResourceTag>>,
}

/// Public IP as embedded in a NAT service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PublicIpLight {
    pub public_ip: Option<String>,
    pub public_ip_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default, deny_unknown_fields)]
pub struct FiltersNatService {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nat_service_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_keys: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReadNatServicesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FiltersNatService>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ReadNatServicesResponse {
    pub nat_services: Option<Vec<NatService>>,
    pub response_context: Option<ResponseContext>,
}
