use super::ResponseContext;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Policy {
    pub creation_date: Option<String>,
    pub description: Option<String>,
    pub is_linkable: Option<bool>,
    pub last_modification_date: Option<String>,
    pub orn: Option<String>,
    pub path: Option<String>,
    pub policy_default_version_id: Option<String>,
    pub policy_id: Option<String>,
    pub policy_name: Option<String>,
    pub resources_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PolicyVersion {
    pub body: Option<String>,
    pub creation_date: Option<String>,
    pub default_version: Option<bool>,
    pub version_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatePolicyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub policy_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreatePolicyResponse {
    pub policy: Option<Policy>,
    pub response_context: Option<ResponseContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReadPolicyRequest {
    pub policy_orn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ReadPolicyResponse {
    pub policy: Option<Policy>,
    pub response_context: Option<ResponseContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeletePolicyRequest {
    pub policy_orn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReadPolicyVersionsRequest {
    pub policy_orn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ReadPolicyVersionsResponse {
    pub policy_versions: Option<Vec<PolicyVersion>>,
    pub response_context: Option<ResponseContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeletePolicyVersionRequest {
    pub policy_orn: String,
    pub version_id: String,
}
