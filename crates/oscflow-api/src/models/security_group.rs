use super::{ResourceTag, ResponseContext};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SecurityGroup {
    pub account_id: Option<String>,
    pub description: Option<String>,
    pub inbound_rules: Option<Vec<SecurityGroupRule>>,
    pub outbound_rules: Option<Vec<SecurityGroupRule>>,
    pub net_id: Option<String>,
    pub security_group_id: Option<String>,
    pub security_group_name: Option<String>,
    pub tags: Option<Vec<ResourceTag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SecurityGroupRule {
    pub from_port_range: Option<i64>,
    pub to_port_range: Option<i64>,
    pub ip_protocol: Option<String>,
    pub ip_ranges: Option<Vec<String>>,
    pub security_groups_members: Option<Vec<SecurityGroupsMember>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SecurityGroupsMember {
    pub account_id: Option<String>,
    pub security_group_id: Option<String>,
    pub security_group_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateSecurityGroupRequest {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_id: Option<String>,
    pub security_group_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreateSecurityGroupResponse {
    pub security_group: Option<SecurityGroup>,
    pub response_context: Option<ResponseContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteSecurityGroupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_group_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default, deny_unknown_fields)]
pub struct FiltersSecurityGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_group_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_group_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_keys: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReadSecurityGroupsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FiltersSecurityGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ReadSecurityGroupsResponse {
    pub security_groups: Option<Vec<SecurityGroup>>,
    pub response_context: Option<ResponseContext>,
}
