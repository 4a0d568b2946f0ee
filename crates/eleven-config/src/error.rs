use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error("No Eleven config found in {}", .0.display())]
    NotInstalled(PathBuf),

    #[error("Invalid value \"{value}\" for {name}: {reason}")]
    InvalidSetting {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Config file version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u64, supported: u64 },

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ConfigError> for eleven_core::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotInstalled(_) => eleven_core::Error::NotInstalled,
            other => eleven_core::Error::persistence(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_installed_maps_to_core_error() {
        let err: eleven_core::Error = ConfigError::NotInstalled(PathBuf::from("/tmp/eleven")).into();

        assert!(err.is_not_installed());
    }

    #[test]
    fn test_storage_errors_map_to_persistence() {
        let err: eleven_core::Error = ConfigError::UnsupportedVersion {
            found: 3,
            supported: 1,
        }
        .into();

        match err {
            eleven_core::Error::Persistence(source) => {
                assert_eq!(
                    source.to_string(),
                    "Config file version 3 is newer than supported version 1"
                );
            }
            other => panic!("expected Persistence, got {:?}", other),
        }
    }
}
