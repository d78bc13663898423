//! Resource lifecycle commands backed by the local state file

use crate::{args, output};
use anyhow::Context;
use colored::Colorize;
use oscflow_cloud::{
    CloudError, GlobalState, LockedState, Resource, ResourceData, ResourceRecord, Schema,
    StateManager, resource_key,
};
use oscflow_provider::OscProvider;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

fn schema(resource_type: &str) -> anyhow::Result<Schema> {
    oscflow_provider::resources::all()
        .into_iter()
        .find(|r| r.type_name() == resource_type)
        .map(|r| r.schema())
        .ok_or_else(|| CloudError::UnknownType(resource_type.to_string()).into())
}

fn record(state: &LockedState, resource_type: &str, name: &str) -> anyhow::Result<ResourceRecord> {
    let key = resource_key(resource_type, name);
    state
        .get_resource(&key)
        .cloned()
        .with_context(|| format!("{} is not in the state file", key))
}

pub async fn create(
    profile: Option<&str>,
    state_dir: &Path,
    resource_type: &str,
    name: &str,
    attributes: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let attributes = args::attributes(&schema(resource_type)?, &attributes)?;
    let provider = super::provider(profile)?;
    let mut state = StateManager::new(state_dir).lock().await?;

    let key = resource_key(resource_type, name);
    if state.get_resource(&key).is_some() {
        anyhow::bail!("{} already exists in the state file", key);
    }

    println!("{}", format!("Creating {}...", key).yellow());
    let created = create_recorded(&provider, &mut state, resource_type, name, attributes).await;

    match created {
        Ok(d) => {
            println!("{} {}", "✓ Created".green().bold(), key);
            output::print_data(&d);
            state.commit().await?;
            Ok(())
        }
        Err(e) => {
            // Keep the id of a resource that exists but did not settle
            if state.get_resource(&key).is_some() {
                println!(
                    "{}",
                    format!("{} was created but did not settle; it stays recorded", key).yellow()
                );
                state.commit().await?;
            }
            Err(e.into())
        }
    }
}

/// Create the resource and record it in `state`.
///
/// A create that fails after the API assigned an id still leaves a record.
async fn create_recorded(
    provider: &OscProvider,
    state: &mut GlobalState,
    resource_type: &str,
    name: &str,
    attributes: BTreeMap<String, Value>,
) -> Result<ResourceData, CloudError> {
    let mut d = ResourceData::for_create(attributes);
    let result = provider.create(resource_type, &mut d).await;

    if d.exists() {
        state.set_resource(ResourceRecord::new(resource_type, name, d.clone()));
    }
    result.map(|()| d)
}

pub async fn refresh(
    profile: Option<&str>,
    state_dir: &Path,
    resource_type: &str,
    name: &str,
) -> anyhow::Result<()> {
    schema(resource_type)?;
    let provider = super::provider(profile)?;
    let mut state = StateManager::new(state_dir).lock().await?;

    let mut record = record(&state, resource_type, name)?;
    let mut d = record.data.clone();
    provider.read(resource_type, &mut d).await?;

    if !d.exists() {
        println!(
            "{}",
            format!("{} no longer exists, removing it from the state file", record.key()).yellow()
        );
        state.remove_resource(&record.key());
    } else {
        println!("{} {}", "✓ Refreshed".green().bold(), record.key());
        output::print_data(&d);
        record.update_data(d);
        state.set_resource(record);
    }
    state.commit().await?;
    Ok(())
}

pub async fn update(
    profile: Option<&str>,
    state_dir: &Path,
    resource_type: &str,
    name: &str,
    attributes: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let attributes = args::attributes(&schema(resource_type)?, &attributes)?;
    let provider = super::provider(profile)?;
    let mut state = StateManager::new(state_dir).lock().await?;

    let mut record = record(&state, resource_type, name)?;
    let mut new = record.data.clone();
    for (key, value) in attributes {
        new.set(key, value);
    }

    provider.update(resource_type, &record.data, &mut new).await?;

    println!("{} {}", "✓ Updated".green().bold(), record.key());
    output::print_data(&new);
    record.update_data(new);
    state.set_resource(record);
    state.commit().await?;
    Ok(())
}

pub async fn delete(
    profile: Option<&str>,
    state_dir: &Path,
    resource_type: &str,
    name: &str,
) -> anyhow::Result<()> {
    schema(resource_type)?;
    let provider = super::provider(profile)?;
    let mut state = StateManager::new(state_dir).lock().await?;

    let record = record(&state, resource_type, name)?;
    let mut d = record.data.clone();

    println!("{}", format!("Deleting {}...", record.key()).yellow());
    provider.delete(resource_type, &mut d).await?;

    state.remove_resource(&record.key());
    println!("{} {}", "✓ Deleted".green().bold(), record.key());
    state.commit().await?;
    Ok(())
}
