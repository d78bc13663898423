//! Command-line attribute and filter parsing

use anyhow::{Context, bail};
use oscflow_cloud::{AttrType, FILTER_ATTRIBUTE, Filter, Schema};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Parse `KEY=VALUE`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid KEY=VALUE: no `=` found in `{}`", s)),
    }
}

/// Convert a raw command-line value to the attribute's declared type.
///
/// Lists accept JSON or a comma-separated string; `tags` also accepts
/// `key=value,key=value`. Unknown attributes stay strings and are rejected
/// later by the schema.
pub fn attribute_value(schema: &Schema, key: &str, raw: &str) -> anyhow::Result<Value> {
    let Some(attr) = schema.get(key) else {
        return Ok(Value::String(raw.to_string()));
    };

    let value = match attr.kind {
        AttrType::String => Value::String(raw.to_string()),
        AttrType::Int => json!(
            raw.parse::<i64>()
                .with_context(|| format!("{} expects an integer, got `{}`", key, raw))?
        ),
        AttrType::Bool => json!(
            raw.parse::<bool>()
                .with_context(|| format!("{} expects true or false, got `{}`", key, raw))?
        ),
        AttrType::List if raw.trim_start().starts_with('[') => {
            serde_json::from_str(raw).with_context(|| format!("{} is not a JSON list", key))?
        }
        AttrType::List if key == "tags" => tag_list(raw)?,
        AttrType::List => Value::Array(split(raw).map(Value::from).collect()),
        AttrType::Map => {
            serde_json::from_str(raw).with_context(|| format!("{} is not a JSON object", key))?
        }
    };
    Ok(value)
}

fn split(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn tag_list(raw: &str) -> anyhow::Result<Value> {
    let mut tags = Vec::new();
    for pair in split(raw) {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("tags expects key=value pairs, got `{}`", pair);
        };
        let mut tag = Map::new();
        tag.insert("key".to_string(), json!(key));
        tag.insert("value".to_string(), json!(value));
        tags.push(Value::Object(tag));
    }
    Ok(Value::Array(tags))
}

/// Typed attribute map from `KEY=VALUE` pairs.
pub fn attributes(schema: &Schema, pairs: &[(String, String)]) -> anyhow::Result<BTreeMap<String, Value>> {
    pairs
        .iter()
        .map(|(key, raw)| Ok((key.clone(), attribute_value(schema, key, raw)?)))
        .collect()
}

/// `filter` attribute value from `NAME=V1,V2` pairs.
pub fn filters(pairs: &[(String, String)]) -> anyhow::Result<Option<Value>> {
    if pairs.is_empty() {
        return Ok(None);
    }

    let filters: Vec<Filter> = pairs
        .iter()
        .map(|(name, values)| Filter {
            name: name.clone(),
            values: split(values).map(str::to_string).collect(),
        })
        .collect();

    let value = serde_json::to_value(filters)
        .with_context(|| format!("cannot encode {} blocks", FILTER_ATTRIBUTE))?;
    Ok(Some(value))
}
