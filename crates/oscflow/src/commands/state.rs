use colored::Colorize;
use oscflow_cloud::StateManager;
use std::path::Path;

pub async fn handle(state_dir: &Path) -> anyhow::Result<()> {
    let state = StateManager::new(state_dir).load().await?;

    if state.resources.is_empty() {
        println!("{}", "No resources recorded".dimmed());
        return Ok(());
    }

    println!(
        "{} ({} resources, updated {})",
        "State".bold(),
        state.resources.len(),
        state.updated_at.format("%Y-%m-%d %H:%M:%S")
    );
    for record in state.resources.values() {
        let id = if record.data.exists() {
            record.data.id().cyan()
        } else {
            "(gone)".yellow()
        };
        println!("  {:40} {}", record.key(), id);
    }
    Ok(())
}
