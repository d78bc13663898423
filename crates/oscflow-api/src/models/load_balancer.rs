use super::{ResourceTag, ResponseContext};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoadBalancer {
    pub backend_vm_ids: Option<Vec<String>>,
    pub dns_name: Option<String>,
    pub load_balancer_name: Option<String>,
    pub load_balancer_type: Option<String>,
    pub net_id: Option<String>,
    pub subregion_names: Option<Vec<String>>,
    pub tags: Option<Vec<ResourceTag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default, deny_unknown_fields)]
pub struct FiltersLoadBalancer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_balancer_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReadLoadBalancersRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FiltersLoadBalancer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ReadLoadBalancersResponse {
    pub load_balancers: Option<Vec<LoadBalancer>>,
    pub response_context: Option<ResponseContext>,
}
