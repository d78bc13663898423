use super::{ResourceTag, ResponseContext};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PublicIp {
    pub link_public_ip_id: Option<String>,
    pub nic_account_id: Option<String>,
    pub nic_id: Option<String>,
    pub private_ip: Option<String>,
    pub public_ip: Option<String>,
    pub public_ip_id: Option<String>,
    pub vm_id: Option<String>,
    pub tags: Option<Vec<ResourceTag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatePublicIpRequest {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreatePublicIpResponse {
    pub public_ip: Option<PublicIp>,
    pub response_context: Option<ResponseContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeletePublicIpRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_ip_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default, deny_unknown_fields)]
pub struct FiltersPublicIp {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_public_ip_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nic_account_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nic_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_ips: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_ip_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_ips: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_keys: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReadPublicIpsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FiltersPublicIp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ReadPublicIpsResponse {
    pub public_ips: Option<Vec<PublicIp>>,
    pub response_context: Option<ResponseContext>,
}
