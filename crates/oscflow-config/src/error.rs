use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Profile '{profile}' not found in {}", path.display())]
    ProfileNotFound { profile: String, path: PathBuf },

    #[error(
        "No credentials found. Set access_key and secret_key in the '{0}' profile of \
        ~/.osc/config.json, or export OSC_ACCESS_KEY and OSC_SECRET_KEY"
    )]
    MissingCredentials(String),

    #[error("Cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
