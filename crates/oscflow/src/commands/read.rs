use crate::{args, output};
use colored::Colorize;
use oscflow_cloud::{CloudError, DataSource, FILTER_ATTRIBUTE, ResourceData};

pub async fn handle(
    profile: Option<&str>,
    data_source: &str,
    attributes: Vec<(String, String)>,
    filters: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let schema = oscflow_provider::data_sources::all()
        .into_iter()
        .find(|ds| ds.type_name() == data_source)
        .map(|ds| ds.schema())
        .ok_or_else(|| CloudError::UnknownType(data_source.to_string()))?;

    let mut d = ResourceData::new();
    for (key, value) in args::attributes(&schema, &attributes)? {
        d.set(key, value);
    }
    if let Some(filter) = args::filters(&filters)? {
        d.set(FILTER_ATTRIBUTE, filter);
    }

    let provider = super::provider(profile)?;
    provider.read_data_source(data_source, &mut d).await?;

    println!("{} {}", "✓".green(), data_source.bold());
    output::print_data(&d);
    Ok(())
}
