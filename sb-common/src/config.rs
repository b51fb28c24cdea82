//! Configuration loading and resolution
//!
//! Resolution priority for every setting, following the same tier order
//! across all binaries:
//! 1. Environment variable (highest priority)
//! 2. TOML config file (`storybank.toml`)
//! 3. Compiled default (credentials have none and fail instead)
//!
//! Missing credentials are a startup-fatal `Error::Config`; the binaries
//! never proceed with partial configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Environment variable carrying the tabular API key
pub const ENV_API_KEY: &str = "AIRTABLE_API_KEY";
/// Environment variable carrying the tabular base id
pub const ENV_BASE_ID: &str = "AIRTABLE_BASE_ID";
/// Environment variable overriding the config file location
pub const ENV_CONFIG_FILE: &str = "STORYBANK_CONFIG";
/// Environment variable overriding the JSON artifact directory
pub const ENV_DATA_DIR: &str = "STORYBANK_DATA_DIR";
/// Environment variable overriding the original photos directory
pub const ENV_PHOTOS_DIR: &str = "STORYBANK_PHOTOS_DIR";
/// Environment variable overriding the optimized photos directory
pub const ENV_OPTIMIZED_DIR: &str = "STORYBANK_OPTIMIZED_DIR";
/// Environment variable overriding the read API port
pub const ENV_PORT: &str = "STORYBANK_PORT";

/// TOML config file schema (`storybank.toml`)
///
/// All fields optional; the file itself is optional. A missing or partial
/// file never terminates startup on its own; only missing credentials do.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api_key: Option<String>,
    pub base_id: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub photos_dir: Option<PathBuf>,
    pub optimized_dir: Option<PathBuf>,
    pub port: Option<u16>,
}

impl TomlConfig {
    /// Load the TOML config from the resolved file location.
    ///
    /// Returns defaults when no file exists. A file that exists but does
    /// not parse is a Config error, surfaced rather than swallowed.
    pub fn load() -> Result<Self> {
        let Some(path) = config_file_path() else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }
}

/// Locate the config file: `STORYBANK_CONFIG` override, then
/// `./storybank.toml`, then the per-user config directory.
fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(ENV_CONFIG_FILE) {
        return Some(PathBuf::from(path));
    }

    let local = PathBuf::from("storybank.toml");
    if local.exists() {
        return Some(local);
    }

    let user = dirs::config_dir().map(|d| d.join("storybank").join("storybank.toml"));
    match user {
        Some(path) if path.exists() => Some(path),
        _ => None,
    }
}

/// Validate a credential value (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Credentials for the remote tabular source.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub api_key: String,
    pub base_id: String,
}

/// Resolve API credentials from ENV → TOML.
///
/// Warns when a credential is present in both sources (potential
/// misconfiguration), then uses the environment value.
pub fn resolve_credentials(toml_config: &TomlConfig) -> Result<ApiCredentials> {
    let api_key = resolve_credential(
        ENV_API_KEY,
        toml_config.api_key.as_deref(),
        "tabular API key",
    )?;
    let base_id = resolve_credential(
        ENV_BASE_ID,
        toml_config.base_id.as_deref(),
        "tabular base id",
    )?;
    Ok(ApiCredentials { api_key, base_id })
}

fn resolve_credential(env_name: &str, toml_value: Option<&str>, label: &str) -> Result<String> {
    let env_value = std::env::var(env_name).ok().filter(|v| is_valid_key(v));
    let toml_value = toml_value.filter(|v| is_valid_key(v));

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both environment and TOML config; using environment (highest priority)",
            label
        );
    }

    if let Some(value) = env_value {
        info!("{} loaded from environment ({})", label, env_name);
        return Ok(value);
    }
    if let Some(value) = toml_value {
        info!("{} loaded from TOML config", label);
        return Ok(value.to_string());
    }

    Err(Error::Config(format!(
        "{} not configured. Set {} or add it to storybank.toml",
        label, env_name
    )))
}

/// Resolve the JSON artifact directory (default `./data`).
pub fn resolve_data_dir(toml_config: &TomlConfig) -> PathBuf {
    resolve_dir(ENV_DATA_DIR, toml_config.data_dir.clone(), "data")
}

/// Resolve the original photos directory (default `./photos/originals`).
pub fn resolve_photos_dir(toml_config: &TomlConfig) -> PathBuf {
    resolve_dir(
        ENV_PHOTOS_DIR,
        toml_config.photos_dir.clone(),
        "photos/originals",
    )
}

/// Resolve the optimized photos directory (default `./photos/optimized`).
pub fn resolve_optimized_dir(toml_config: &TomlConfig) -> PathBuf {
    resolve_dir(
        ENV_OPTIMIZED_DIR,
        toml_config.optimized_dir.clone(),
        "photos/optimized",
    )
}

fn resolve_dir(env_name: &str, toml_value: Option<PathBuf>, default: &str) -> PathBuf {
    if let Ok(path) = std::env::var(env_name) {
        return PathBuf::from(path);
    }
    if let Some(path) = toml_value {
        return path;
    }
    PathBuf::from(default)
}

/// Resolve the read API port (default 5780).
pub fn resolve_port(toml_config: &TomlConfig) -> u16 {
    if let Ok(raw) = std::env::var(ENV_PORT) {
        if let Ok(port) = raw.parse() {
            return port;
        }
        warn!("Ignoring unparseable {}={}", ENV_PORT, raw);
    }
    toml_config.port.unwrap_or(5780)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("keyXXXX"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }

    #[test]
    #[serial]
    fn test_missing_credentials_are_fatal() {
        std::env::remove_var(ENV_API_KEY);
        std::env::remove_var(ENV_BASE_ID);
        let result = resolve_credentials(&TomlConfig::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    #[serial]
    fn test_env_credentials_resolve() {
        std::env::set_var(ENV_API_KEY, "keyTest");
        std::env::set_var(ENV_BASE_ID, "appTest");
        let creds = resolve_credentials(&TomlConfig::default()).unwrap();
        assert_eq!(creds.api_key, "keyTest");
        assert_eq!(creds.base_id, "appTest");
        std::env::remove_var(ENV_API_KEY);
        std::env::remove_var(ENV_BASE_ID);
    }

    #[test]
    #[serial]
    fn test_toml_credentials_resolve_when_env_absent() {
        std::env::remove_var(ENV_API_KEY);
        std::env::remove_var(ENV_BASE_ID);
        let toml_config = TomlConfig {
            api_key: Some("keyToml".to_string()),
            base_id: Some("appToml".to_string()),
            ..Default::default()
        };
        let creds = resolve_credentials(&toml_config).unwrap();
        assert_eq!(creds.api_key, "keyToml");
        assert_eq!(creds.base_id, "appToml");
    }

    #[test]
    #[serial]
    fn test_dir_defaults() {
        std::env::remove_var(ENV_DATA_DIR);
        let dir = resolve_data_dir(&TomlConfig::default());
        assert_eq!(dir, PathBuf::from("data"));
    }
}
