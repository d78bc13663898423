mod args;
mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oscflow")]
#[command(version, about = "Manage Outscale resources from the command line", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Profile of ~/.osc/config.json
    #[arg(long, global = true, env = "OSC_PROFILE")]
    profile: Option<String>,

    /// Directory holding the .oscflow state directory
    #[arg(long, global = true, default_value = ".")]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List resource and data source types
    Types,
    /// Run a data source lookup
    Read {
        /// Data source type (e.g., nat_service)
        data_source: String,
        /// Attribute (KEY=VALUE)
        #[arg(short = 'a', long = "attr", value_parser = args::parse_key_val)]
        attributes: Vec<(String, String)>,
        /// Filter (NAME=VALUE[,VALUE...])
        #[arg(short = 'f', long = "filter", value_parser = args::parse_key_val)]
        filters: Vec<(String, String)>,
    },
    /// Create a resource and record it in the state file
    Create {
        /// Resource type (e.g., security_group)
        resource_type: String,
        /// Local name of the resource
        name: String,
        /// Attribute (KEY=VALUE)
        #[arg(short = 'a', long = "attr", value_parser = args::parse_key_val)]
        attributes: Vec<(String, String)>,
    },
    /// Refresh a recorded resource from the API
    Refresh {
        resource_type: String,
        name: String,
    },
    /// Update a recorded resource in place
    Update {
        resource_type: String,
        name: String,
        /// Attribute (KEY=VALUE)
        #[arg(short = 'a', long = "attr", value_parser = args::parse_key_val)]
        attributes: Vec<(String, String)>,
    },
    /// Delete a recorded resource
    Delete {
        resource_type: String,
        name: String,
    },
    /// Show recorded resources
    State,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "oscflow=debug" } else { "oscflow=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let profile = cli.profile.as_deref();
    let state_dir = cli.state_dir.as_path();

    match cli.command {
        Commands::Types => commands::types::handle(),
        Commands::State => commands::state::handle(state_dir).await?,
        Commands::Read {
            data_source,
            attributes,
            filters,
        } => {
            commands::read::handle(profile, &data_source, attributes, filters).await?;
        }
        Commands::Create {
            resource_type,
            name,
            attributes,
        } => {
            commands::resource::create(profile, state_dir, &resource_type, &name, attributes).await?;
        }
        Commands::Refresh {
            resource_type,
            name,
        } => {
            commands::resource::refresh(profile, state_dir, &resource_type, &name).await?;
        }
        Commands::Update {
            resource_type,
            name,
            attributes,
        } => {
            commands::resource::update(profile, state_dir, &resource_type, &name, attributes).await?;
        }
        Commands::Delete {
            resource_type,
            name,
        } => {
            commands::resource::delete(profile, state_dir, &resource_type, &name).await?;
        }
    }

    Ok(())
}
