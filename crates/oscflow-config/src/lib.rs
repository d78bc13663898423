//! Provider configuration
//!
//! Credentials and endpoints come from the Outscale profile file
//! (`~/.osc/config.json`), overridden field by field by the environment:
//!
//! | variable | overrides |
//! |---|---|
//! | `OSC_CONFIG_FILE` | profile file path |
//! | `OSC_PROFILE` | profile name (default `default`) |
//! | `OSC_ACCESS_KEY` / `OSC_SECRET_KEY` | credentials |
//! | `OSC_REGION` | region |
//! | `OSC_ENDPOINT_API` | API endpoint |

pub mod error;

pub use error::*;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_REGION: &str = "eu-west-2";

/// One profile of the profile file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub region: Option<String>,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub api: Option<String>,
}

/// Resolved provider configuration
#[derive(Clone, PartialEq)]
pub struct ProviderConfig {
    pub profile: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub endpoint: String,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("profile", &self.profile)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// API endpoint of a region
pub fn default_endpoint(region: &str) -> String {
    format!("https://api.{}.outscale.com", region)
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Location of the profile file
///
/// `OSC_CONFIG_FILE` wins over `~/.osc/config.json`.
pub fn config_file_path() -> Result<PathBuf> {
    if let Some(path) = env("OSC_CONFIG_FILE") {
        return Ok(PathBuf::from(path));
    }

    let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
    Ok(home.join(".osc").join("config.json"))
}

/// Read every profile of `path`; a missing file has no profiles.
pub fn load_profiles(path: &Path) -> Result<BTreeMap<String, Profile>> {
    if !path.exists() {
        tracing::debug!("Profile file {} not found", path.display());
        return Ok(BTreeMap::new());
    }

    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve the configuration for `profile`.
///
/// The profile name falls back to `OSC_PROFILE`, then `default`. Naming a
/// profile explicitly that the file lacks is an error; the implicit
/// default profile may be absent when the environment supplies everything.
pub fn load(profile: Option<&str>) -> Result<ProviderConfig> {
    let explicit = profile.map(str::to_string).or_else(|| env("OSC_PROFILE"));
    let name = explicit.clone().unwrap_or_else(|| DEFAULT_PROFILE.to_string());

    let path = config_file_path()?;
    let mut profiles = load_profiles(&path)?;

    let file_profile = match profiles.remove(&name) {
        Some(p) => p,
        None if explicit.is_some() && path.exists() => {
            return Err(ConfigError::ProfileNotFound {
                profile: name,
                path,
            });
        }
        None => Profile::default(),
    };

    resolve(name, file_profile)
}

fn resolve(name: String, profile: Profile) -> Result<ProviderConfig> {
    let access_key = env("OSC_ACCESS_KEY").or(profile.access_key);
    let secret_key = env("OSC_SECRET_KEY").or(profile.secret_key);
    let (Some(access_key), Some(secret_key)) = (access_key, secret_key) else {
        return Err(ConfigError::MissingCredentials(name));
    };

    let region = env("OSC_REGION")
        .or(profile.region)
        .unwrap_or_else(|| DEFAULT_REGION.to_string());
    let endpoint = env("OSC_ENDPOINT_API")
        .or(profile.endpoints.api)
        .unwrap_or_else(|| default_endpoint(&region));

    Ok(ProviderConfig {
        profile: name,
        access_key,
        secret_key,
        region,
        endpoint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    const PROFILES: &str = r#"{
        "default": {
            "access_key": "AK_DEFAULT",
            "secret_key": "SK_DEFAULT",
            "region": "eu-west-2"
        },
        "us": {
            "access_key": "AK_US",
            "secret_key": "SK_US",
            "region": "us-east-2",
            "endpoints": { "api": "https://api.us-east-2.outscale.com/" }
        }
    }"#;

    const CLEAR: [(&str, Option<&str>); 6] = [
        ("OSC_PROFILE", None),
        ("OSC_ACCESS_KEY", None),
        ("OSC_SECRET_KEY", None),
        ("OSC_REGION", None),
        ("OSC_ENDPOINT_API", None),
        ("OSC_CONFIG_FILE", None),
    ];

    fn with_profile_file<R>(vars: &[(&str, Option<&str>)], f: impl FnOnce() -> R) -> R {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, PROFILES).unwrap();
        let path = path.to_str().unwrap().to_string();

        let mut all: Vec<(&str, Option<&str>)> = CLEAR.to_vec();
        all.retain(|(k, _)| *k != "OSC_CONFIG_FILE");
        all.push(("OSC_CONFIG_FILE", Some(path.as_str())));
        all.extend_from_slice(vars);
        temp_env::with_vars(all, f)
    }

    #[test]
    #[serial]
    fn test_default_profile() {
        let config = with_profile_file(&[], || load(None)).unwrap();

        assert_eq!(config.profile, "default");
        assert_eq!(config.access_key, "AK_DEFAULT");
        assert_eq!(config.endpoint, "https://api.eu-west-2.outscale.com");
    }

    #[test]
    #[serial]
    fn test_named_profile_with_endpoint() {
        let config = with_profile_file(&[], || load(Some("us"))).unwrap();

        assert_eq!(config.region, "us-east-2");
        assert_eq!(config.endpoint, "https://api.us-east-2.outscale.com/");
    }

    #[test]
    #[serial]
    fn test_profile_from_env() {
        let config = with_profile_file(&[("OSC_PROFILE", Some("us"))], || load(None)).unwrap();
        assert_eq!(config.access_key, "AK_US");
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let config = with_profile_file(
            &[
                ("OSC_ACCESS_KEY", Some("AK_ENV")),
                ("OSC_REGION", Some("cloudgouv-eu-west-1")),
            ],
            || load(None),
        )
        .unwrap();

        assert_eq!(config.access_key, "AK_ENV");
        assert_eq!(config.secret_key, "SK_DEFAULT");
        assert_eq!(
            config.endpoint,
            "https://api.cloudgouv-eu-west-1.outscale.com"
        );
    }

    #[test]
    #[serial]
    fn test_unknown_profile() {
        let err = with_profile_file(&[], || load(Some("staging"))).unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound { ref profile, .. } if profile == "staging"));
    }

    #[test]
    #[serial]
    fn test_env_only() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("absent.json");
        let mut vars: Vec<(&str, Option<&str>)> = CLEAR.to_vec();
        vars.retain(|(k, _)| !matches!(*k, "OSC_CONFIG_FILE" | "OSC_ACCESS_KEY" | "OSC_SECRET_KEY"));
        vars.push(("OSC_CONFIG_FILE", missing.to_str()));
        vars.push(("OSC_ACCESS_KEY", Some("AK")));
        vars.push(("OSC_SECRET_KEY", Some("SK")));

        let config = temp_env::with_vars(vars, || load(None)).unwrap();
        assert_eq!(config.region, DEFAULT_REGION);
        assert!(!format!("{:?}", config).contains("SK"));
    }

    #[test]
    #[serial]
    fn test_missing_credentials() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("absent.json");
        let mut vars: Vec<(&str, Option<&str>)> = CLEAR.to_vec();
        vars.retain(|(k, _)| *k != "OSC_CONFIG_FILE");
        vars.push(("OSC_CONFIG_FILE", missing.to_str()));

        let err = temp_env::with_vars(vars, || load(None)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials(_)));
    }

    #[test]
    #[serial]
    fn test_invalid_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_profiles(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_default_endpoint() {
        assert_eq!(
            default_endpoint("ap-northeast-1"),
            "https://api.ap-northeast-1.outscale.com"
        );
    }
}
