use super::{ResourceTag, ResponseContext};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NetAccessPoint {
    pub net_access_point_id: Option<String>,
    pub net_id: Option<String>,
    pub route_table_ids: Option<Vec<String>>,
    pub service_name: Option<String>,
    pub state: Option<String>,
    pub tags: Option<Vec<ResourceTag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default, deny_unknown_fields)]
pub struct FiltersNetAccessPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_access_point_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_keys: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReadNetAccessPointsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FiltersNetAccessPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ReadNetAccessPointsResponse {
    pub net_access_points: Option<Vec<NetAccessPoint>>,
    pub response_context: Option<ResponseContext>,
}
