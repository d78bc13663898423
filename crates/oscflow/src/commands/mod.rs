pub mod read;
pub mod resource;
pub mod state;
pub mod types;

use anyhow::Context;
use oscflow_api::{Client, Credentials};
use oscflow_provider::OscProvider;

/// Provider talking to the API of the selected profile
pub fn provider(profile: Option<&str>) -> anyhow::Result<OscProvider> {
    let config = oscflow_config::load(profile)?;
    tracing::debug!("Using profile {} ({})", config.profile, config.endpoint);

    let client = Client::http(
        config.endpoint.clone(),
        Credentials {
            access_key: config.access_key,
            secret_key: config.secret_key,
        },
    )
    .with_context(|| format!("cannot build a client for {}", config.endpoint))?;

    Ok(OscProvider::new(client))
}
