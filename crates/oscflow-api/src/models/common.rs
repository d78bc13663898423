use oscflow_cloud::{CloudError, FILTER_ATTRIBUTE, Filter, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceTag {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl ResourceTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Output of operations that only return a request id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmptyResponse {
    #[serde(default)]
    pub response_context: Option<ResponseContext>,
}

/// Error body returned with any non-2xx status
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
    #[serde(default)]
    pub response_context: Option<ResponseContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, rename = "Type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind.as_deref().unwrap_or("Error");
        match (&self.code, &self.details) {
            (Some(code), Some(details)) => write!(f, "{} ({}): {}", kind, code, details),
            (Some(code), None) => write!(f, "{} ({})", kind, code),
            (None, Some(details)) => write!(f, "{}: {}", kind, details),
            (None, None) => f.write_str(kind),
        }
    }
}

fn pascal_case(name: &str) -> String {
    name.split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Build an API filter struct from data-source filter blocks.
///
/// Block names are the snake_case form of the filter fields
/// (`net_ids` → `NetIds`). Repeated names merge their values; names the
/// filter struct does not know are rejected.
pub fn decode_filters<F: DeserializeOwned>(filters: &[Filter]) -> Result<F> {
    let mut fields = serde_json::Map::new();
    for filter in filters {
        let entry = fields
            .entry(pascal_case(&filter.name))
            .or_insert_with(|| serde_json::Value::Array(Vec::new()));
        if let serde_json::Value::Array(values) = entry {
            values.extend(filter.values.iter().cloned().map(serde_json::Value::String));
        }
    }

    serde_json::from_value(serde_json::Value::Object(fields))
        .map_err(|e| CloudError::invalid_attribute(FILTER_ATTRIBUTE, e.to_string()))
}
