use colored::Colorize;
use oscflow_cloud::{AttrMode, DataSource, Resource, Schema};
use oscflow_provider::{data_sources, resources};

pub fn handle() {
    println!("{}", "Resources:".bold());
    for resource in resources::all() {
        print_type(resource.type_name(), &resource.schema());
    }

    println!();
    println!("{}", "Data sources:".bold());
    for ds in data_sources::all() {
        print_type(ds.type_name(), &ds.schema());
    }
}

fn print_type(name: &str, schema: &Schema) {
    let settable: Vec<String> = schema
        .iter()
        .filter(|a| a.mode != AttrMode::Computed)
        .map(|a| match a.mode {
            AttrMode::Required => format!("{}*", a.name),
            _ => a.name.to_string(),
        })
        .collect();

    println!("  {:24} {}", name.cyan(), settable.join(", ").dimmed());
}
