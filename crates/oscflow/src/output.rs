use colored::Colorize;
use oscflow_cloud::ResourceData;
use serde_json::Value;

/// Print the id and attributes of a handle.
pub fn print_data(d: &ResourceData) {
    println!("  {} {}", "id:".bold(), d.id().cyan());

    let width = d.attributes().keys().map(String::len).max().unwrap_or(0);
    for (key, value) in d.attributes() {
        println!("  {:width$}  {}", format!("{}:", key).bold(), render(value), width = width + 1);
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".dimmed().to_string(),
        other => other.to_string(),
    }
}
