//! Response-to-attribute helpers

use oscflow_api::models::{ResponseContext, ResourceTag};
use oscflow_cloud::ResourceData;
use serde_json::{Map, Value};

/// Insert `key` only when the source field is present.
pub(crate) fn insert_opt<T: Into<Value>>(map: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value.into());
    }
}

pub(crate) fn string_list(values: Option<&[String]>) -> Value {
    Value::Array(
        values
            .unwrap_or_default()
            .iter()
            .cloned()
            .map(Value::String)
            .collect(),
    )
}

/// Tags as an ordered list of `{key, value}` maps.
pub(crate) fn tags(tags: Option<&[ResourceTag]>) -> Value {
    Value::Array(
        tags.unwrap_or_default()
            .iter()
            .map(|t| {
                let mut map = Map::new();
                map.insert("key".to_string(), Value::String(t.key.clone()));
                map.insert("value".to_string(), Value::String(t.value.clone()));
                Value::Object(map)
            })
            .collect(),
    )
}

pub(crate) fn set_request_id(d: &mut ResourceData, context: Option<&ResponseContext>) {
    d.set_opt("request_id", context.and_then(|c| c.request_id.clone()));
}
