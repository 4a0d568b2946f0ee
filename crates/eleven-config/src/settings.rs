//! Local settings read from the environment

use crate::error::{ConfigError, Result};
use crate::store::ConfigStore;
use std::path::PathBuf;

/// Directory of the local config store
pub const CONFIG_DIR_ENV: &str = "ELEVEN_CONFIG_DIR";
/// Comma separated ports that can never be served
pub const RESERVED_PORTS_ENV: &str = "ELEVEN_RESERVED_PORTS";
pub const DEFAULT_INSTANCE_TYPE_ENV: &str = "ELEVEN_DEFAULT_INSTANCE_TYPE";

/// SSH and the ports used by the domain reverse proxy
pub const DEFAULT_RESERVED_PORTS: &[&str] = &["22", "80", "443"];
pub const DEFAULT_INSTANCE_TYPE: &str = "t2.medium";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub config_dir: PathBuf,
    pub reserved_ports: Vec<String>,
    pub default_instance_type: String,
}

impl Settings {
    /// Read settings from `ELEVEN_*` variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let config_dir = match non_empty_var(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => default_config_dir()?,
        };

        let reserved_ports = match std::env::var(RESERVED_PORTS_ENV) {
            Ok(raw) => parse_reserved_ports(&raw)?,
            Err(_) => DEFAULT_RESERVED_PORTS.iter().map(|port| port.to_string()).collect(),
        };

        let default_instance_type =
            non_empty_var(DEFAULT_INSTANCE_TYPE_ENV).unwrap_or_else(|| DEFAULT_INSTANCE_TYPE.to_string());

        tracing::debug!(
            config_dir = %config_dir.display(),
            reserved_ports = ?reserved_ports,
            default_instance_type = %default_instance_type,
            "Loaded settings"
        );

        Ok(Self {
            config_dir,
            reserved_ports,
            default_instance_type,
        })
    }

    /// File store rooted at the configured directory
    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::new(&self.config_dir)
    }
}

/// `<platform config dir>/eleven`
pub fn default_config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("eleven"))
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_reserved_ports(raw: &str) -> Result<Vec<String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|port| !port.is_empty())
        .map(|port| {
            if eleven_core::is_port(port) {
                Ok(port.to_string())
            } else {
                Err(ConfigError::InvalidSetting {
                    name: RESERVED_PORTS_ENV.to_string(),
                    value: raw.to_string(),
                    reason: format!("\"{}\" is not a port", port),
                })
            }
        })
        .collect()
}
