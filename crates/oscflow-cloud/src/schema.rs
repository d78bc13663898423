//! Attribute schemas for resources and data sources

use crate::error::{CloudError, Result};
use crate::resource::{FILTER_ATTRIBUTE, ResourceData};
use serde_json::Value;

/// Attribute value type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrType {
    String,
    Int,
    Bool,
    List,
    Map,
}

impl AttrType {
    fn matches(self, value: &Value) -> bool {
        match self {
            AttrType::String => value.is_string(),
            AttrType::Int => value.is_i64() || value.is_u64(),
            AttrType::Bool => value.is_boolean(),
            AttrType::List => value.is_array(),
            AttrType::Map => value.is_object(),
        }
    }
}

impl std::fmt::Display for AttrType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttrType::String => write!(f, "string"),
            AttrType::Int => write!(f, "int"),
            AttrType::Bool => write!(f, "bool"),
            AttrType::List => write!(f, "list"),
            AttrType::Map => write!(f, "map"),
        }
    }
}

/// Who sets an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrMode {
    /// The user must set it
    Required,
    /// The user may set it
    Optional,
    /// Only the API sets it
    Computed,
    /// The user may set it, otherwise the API does
    OptionalComputed,
}

impl std::fmt::Display for AttrMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttrMode::Required => write!(f, "required"),
            AttrMode::Optional => write!(f, "optional"),
            AttrMode::Computed => write!(f, "computed"),
            AttrMode::OptionalComputed => write!(f, "optional+computed"),
        }
    }
}

pub type Validator = fn(&Value) -> std::result::Result<(), String>;

/// A single attribute declaration
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttrType,
    pub mode: AttrMode,
    /// Changing the value requires replacing the resource
    pub force_new: bool,
    pub default: Option<Value>,
    pub validator: Option<Validator>,
}

impl Attribute {
    fn new(name: &'static str, kind: AttrType, mode: AttrMode) -> Self {
        Self {
            name,
            kind,
            mode,
            force_new: false,
            default: None,
            validator: None,
        }
    }

    pub fn required(name: &'static str, kind: AttrType) -> Self {
        Self::new(name, kind, AttrMode::Required)
    }

    pub fn optional(name: &'static str, kind: AttrType) -> Self {
        Self::new(name, kind, AttrMode::Optional)
    }

    pub fn computed(name: &'static str, kind: AttrType) -> Self {
        Self::new(name, kind, AttrMode::Computed)
    }

    pub fn optional_computed(name: &'static str, kind: AttrType) -> Self {
        Self::new(name, kind, AttrMode::OptionalComputed)
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn validate_with(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }
}

/// Validator limiting a string attribute's length.
pub fn max_len_255(value: &Value) -> std::result::Result<(), String> {
    match value.as_str() {
        Some(s) if s.chars().count() > 255 => Err("cannot be longer than 255 characters".to_string()),
        _ => Ok(()),
    }
}

fn validate_filters(value: &Value) -> std::result::Result<(), String> {
    let blocks = value.as_array().ok_or("must be a list of filter blocks")?;
    for block in blocks {
        let name_ok = block.get("name").is_some_and(Value::is_string);
        let values_ok = block
            .get("values")
            .and_then(Value::as_array)
            .is_some_and(|vs| vs.iter().all(Value::is_string));
        if !name_ok || !values_ok {
            return Err("each filter needs a string 'name' and a list of string 'values'".to_string());
        }
    }
    Ok(())
}

/// Ordered set of attribute declarations
#[derive(Debug, Clone, Default)]
pub struct Schema {
    attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }

    /// Schema for a data source: adds the optional `filter` block.
    pub fn data_source(mut attributes: Vec<Attribute>) -> Self {
        attributes.insert(
            0,
            Attribute::optional(FILTER_ATTRIBUTE, AttrType::List).validate_with(validate_filters),
        );
        Self { attributes }
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    /// Apply defaults, then check presence, types and validators.
    pub fn prepare(&self, d: &mut ResourceData) -> Result<()> {
        if let Some(unknown) = d.attributes().keys().find(|k| self.get(k).is_none()) {
            return Err(CloudError::invalid_attribute(
                unknown.clone(),
                "not a known attribute",
            ));
        }

        for attr in &self.attributes {
            let current = d.get(attr.name).cloned();
            let value = match current {
                Some(v) => v,
                None => match (&attr.default, attr.mode) {
                    (Some(default), _) => {
                        d.set(attr.name, default.clone());
                        default.clone()
                    }
                    (None, AttrMode::Required) => {
                        return Err(CloudError::MissingArgument(attr.name.to_string()));
                    }
                    (None, _) => continue,
                },
            };

            if !attr.kind.matches(&value) {
                return Err(CloudError::invalid_attribute(
                    attr.name,
                    format!("expected {}", attr.kind),
                ));
            }
            if let Some(validator) = attr.validator {
                validator(&value).map_err(|reason| CloudError::invalid_attribute(attr.name, reason))?;
            }
        }
        Ok(())
    }

    /// Force-new attributes whose value differs between `old` and `new`.
    pub fn replacement_attributes(&self, old: &ResourceData, new: &ResourceData) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|a| a.force_new && a.mode != AttrMode::Computed)
            .filter(|a| new.get(a.name).is_some() && old.get(a.name) != new.get(a.name))
            .map(|a| a.name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn group_schema() -> Schema {
        Schema::new(vec![
            Attribute::optional("description", AttrType::String)
                .force_new()
                .default_value("Managed by oscflow")
                .validate_with(max_len_255),
            Attribute::required("net_id", AttrType::String).force_new(),
            Attribute::optional("tags", AttrType::List),
            Attribute::computed("account_id", AttrType::String),
        ])
    }

    #[test]
    fn test_prepare_applies_defaults() {
        let mut d = ResourceData::new().with_attribute("net_id", "vpc-1");
        group_schema().prepare(&mut d).unwrap();

        assert_eq!(d.get_str("description"), Some("Managed by oscflow"));
    }

    #[test]
    fn test_prepare_rejects_missing_required() {
        let mut d = ResourceData::new();
        let err = group_schema().prepare(&mut d).unwrap_err();

        assert!(matches!(err, CloudError::MissingArgument(ref a) if a == "net_id"));
    }

    #[test]
    fn test_prepare_rejects_long_description() {
        let mut d = ResourceData::new()
            .with_attribute("net_id", "vpc-1")
            .with_attribute("description", "x".repeat(256));
        let err = group_schema().prepare(&mut d).unwrap_err();

        assert!(err.to_string().contains("255"));
    }

    #[test]
    fn test_prepare_rejects_wrong_type_and_unknown() {
        let mut d = ResourceData::new().with_attribute("net_id", 12);
        assert!(group_schema().prepare(&mut d).is_err());

        let mut d = ResourceData::new()
            .with_attribute("net_id", "vpc-1")
            .with_attribute("colour", "blue");
        let err = group_schema().prepare(&mut d).unwrap_err();
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn test_data_source_filter_validation() {
        let schema = Schema::data_source(vec![Attribute::optional_computed(
            "nat_service_id",
            AttrType::String,
        )]);

        let mut ok = ResourceData::new()
            .with_attribute("filter", json!([{ "name": "net_ids", "values": ["net-1"] }]));
        schema.prepare(&mut ok).unwrap();

        let mut bad = ResourceData::new().with_attribute("filter", json!([{ "name": "net_ids" }]));
        assert!(schema.prepare(&mut bad).is_err());
    }

    #[test]
    fn test_replacement_attributes() {
        let schema = group_schema();
        let old = ResourceData::new()
            .with_attribute("net_id", "vpc-1")
            .with_attribute("tags", json!([]));
        let new = ResourceData::new()
            .with_attribute("net_id", "vpc-2")
            .with_attribute("tags", json!([{ "key": "env", "value": "prod" }]));

        assert_eq!(schema.replacement_attributes(&old, &new), vec!["net_id"]);
    }
}
