//! Declared-vs-observed state handle passed to every CRUD function

use crate::error::{CloudError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute holding data-source filter blocks.
pub const FILTER_ATTRIBUTE: &str = "filter";

/// State of a single resource or data source
///
/// Holds the user's declared attributes and, after a CRUD call, the values
/// observed on the API. An empty id means the resource does not exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    /// Provider-specific resource ID
    #[serde(default)]
    id: String,

    /// Attribute values keyed by schema name
    #[serde(default)]
    attributes: BTreeMap<String, Value>,

    #[serde(skip)]
    new_resource: bool,
}

/// Data-source filter block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub name: String,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new(name: impl Into<String>, values: &[&str]) -> Self {
        Self {
            name: name.into(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Whether a value is the zero value of its type.
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for a resource about to be created.
    pub fn for_create(attributes: BTreeMap<String, Value>) -> Self {
        Self {
            id: String::new(),
            attributes,
            new_resource: true,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Mark the resource as gone.
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn is_new_resource(&self) -> bool {
        self.new_resource
    }

    pub fn mark_new_resource(&mut self, new_resource: bool) {
        self.new_resource = new_resource;
    }

    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    /// Value of `key` when it is set to something other than its zero value.
    pub fn get_ok(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !is_zero(v))
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get_ok(key).and_then(Value::as_str)
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_str(key).map(str::to_string)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// String elements of a list attribute; non-string elements are skipped.
    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Required string attribute.
    pub fn require_str(&self, key: &str) -> Result<&str> {
        self.get_str(key)
            .ok_or_else(|| CloudError::MissingArgument(key.to_string()))
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Set `key` only when the source value is present.
    pub fn set_opt<T: Into<Value>>(&mut self, key: impl Into<String>, value: Option<T>) {
        if let Some(value) = value {
            self.attributes.insert(key.into(), value.into());
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    /// Deserialize an attribute into `T`.
    pub fn decode<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            Some(v) => serde_json::from_value(v.clone())
                .map(Some)
                .map_err(|e| CloudError::invalid_attribute(key, e.to_string())),
            None => Ok(None),
        }
    }

    /// Filter blocks of a data source, if any were declared.
    pub fn filters(&self) -> Result<Option<Vec<Filter>>> {
        let filters: Option<Vec<Filter>> = self.decode(FILTER_ATTRIBUTE)?;
        Ok(filters.filter(|f| !f.is_empty()))
    }
}
