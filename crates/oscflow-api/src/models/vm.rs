use super::ResponseContext;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VmStates {
    pub maintenance_events: Option<Vec<MaintenanceEvent>>,
    pub subregion_name: Option<String>,
    pub vm_id: Option<String>,
    pub vm_state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MaintenanceEvent {
    pub code: Option<String>,
    pub description: Option<String>,
    pub not_after: Option<String>,
    pub not_before: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default, deny_unknown_fields)]
pub struct FiltersVmsState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_event_codes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subregion_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_states: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReadVmsStateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_vms: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FiltersVmsState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ReadVmsStateResponse {
    pub vm_states: Option<Vec<VmStates>>,
    pub response_context: Option<ResponseContext>,
}
